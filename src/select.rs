//! Discovery of the source files to convert.

use crate::error::{MigrateError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Literal suffix identifying test sources when no pattern is given.
pub const DEFAULT_PATTERN_TEXT: &str = "Test.java";

/// The default search pattern: the escaped form of [`DEFAULT_PATTERN_TEXT`].
pub fn default_pattern() -> String {
	regex::escape(DEFAULT_PATTERN_TEXT)
}

/// Compile a file pattern.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| MigrateError::InvalidPattern {
		pattern: pattern.to_string(),
		source,
	})
}

/// Collect every regular file under `root` whose path matches `pattern`.
///
/// The pattern is searched anywhere in the path relative to `root`, not
/// anchored, so the names of `root` and its ancestors never match. Directories are
/// recursed into but never returned, and symlinks are not followed. The first
/// unreadable directory aborts the walk.
pub fn select_files(root: &Path, pattern: &Regex) -> Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in WalkDir::new(root).sort_by_file_name() {
		let entry = entry.map_err(|source| MigrateError::TraversalError {
			root: root.to_path_buf(),
			source,
		})?;
		if !entry.file_type().is_file() {
			continue;
		}
		let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
		if pattern.is_match(&relative.to_string_lossy()) {
			files.push(entry.into_path());
		}
	}

	tracing::debug!(root = %root.display(), pattern = %pattern, count = files.len(), "selected files");
	Ok(files)
}
