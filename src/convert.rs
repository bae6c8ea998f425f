//! Per-file conversion: read, transform, and atomically replace.

use crate::error::{MigrateError, Result};
use crate::rules::{Family, Rewriter};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
	/// Content changed; it was written unless this is a dry run.
	Converted {
		path: PathBuf,
		rewrites: Vec<(Family, usize)>,
	},

	/// No rule matched; the file was not touched.
	Unchanged { path: PathBuf },

	/// The file is not valid UTF-8 and was skipped.
	Skipped { path: PathBuf },
}

impl FileOutcome {
	pub fn path(&self) -> &Path {
		match self {
			FileOutcome::Converted { path, .. }
			| FileOutcome::Unchanged { path }
			| FileOutcome::Skipped { path } => path,
		}
	}

	pub fn is_converted(&self) -> bool {
		matches!(self, FileOutcome::Converted { .. })
	}
}

/// Convert one file in place.
///
/// Nothing is written when the content is unchanged or `dry_run` is set.
pub fn convert_file(path: &Path, rewriter: &Rewriter, dry_run: bool) -> Result<FileOutcome> {
	let bytes = fs::read(path).map_err(|source| MigrateError::FileReadError {
		path: path.to_path_buf(),
		source,
	})?;

	let Ok(original) = String::from_utf8(bytes) else {
		tracing::warn!(path = %path.display(), "skipping file that is not valid UTF-8");
		return Ok(FileOutcome::Skipped {
			path: path.to_path_buf(),
		});
	};

	let result = rewriter.run(&original);
	if result.text == original {
		return Ok(FileOutcome::Unchanged {
			path: path.to_path_buf(),
		});
	}

	for (family, count) in &result.rewrites {
		tracing::debug!(path = %path.display(), family = family.name(), count, "rewrote calls");
	}

	if !dry_run {
		write_atomically(path, &result.text)?;
	}

	Ok(FileOutcome::Converted {
		path: path.to_path_buf(),
		rewrites: result.rewrites,
	})
}

/// Replace `path` with `contents` via a temp file in the same directory, so a
/// failure never leaves a truncated file behind. Permissions are preserved.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
	let write_error = |source: std::io::Error| MigrateError::FileWriteError {
		path: path.to_path_buf(),
		source,
	};

	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	let permissions = fs::metadata(path).map_err(write_error)?.permissions();

	let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
	temp.write_all(contents.as_bytes()).map_err(write_error)?;
	temp.as_file().sync_all().map_err(write_error)?;
	fs::set_permissions(temp.path(), permissions).map_err(write_error)?;
	temp.persist(path).map_err(|e| write_error(e.error))?;

	Ok(())
}
