use crate::error::Result;
use crate::rules::{Dialect, MatchMode, Rewriter};
use crate::select::{compile_pattern, default_pattern};
use serde::Deserialize;
use std::path::PathBuf;

/// Log filter used when no config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Top-level configuration from a `.assertj-migrate.toml` file.
///
/// Every field is optional so that files in the cascade can be layered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop the directory cascade here and only add ~/.assertj-migrate.toml.
	#[serde(default)]
	pub root: bool,

	/// Regex searched in each file path. A pattern given on the command line wins.
	pub pattern: Option<String>,

	/// Source assertion convention.
	pub dialect: Option<Dialect>,

	/// Whether rules see the whole file or one line at a time.
	pub match_mode: Option<MatchMode>,

	/// Report files that would change without writing them.
	pub dry_run: Option<bool>,

	/// `tracing` filter directive, e.g. "debug" or "assertj_migrate=trace".
	pub log_level: Option<String>,
}

impl Config {
	/// Validate values that serde cannot check on its own.
	pub fn validate(&self) -> Result<()> {
		if let Some(ref pattern) = self.pattern {
			compile_pattern(pattern)?;
		}
		Ok(())
	}
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Effective settings after merging the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	pub pattern: Option<String>,
	pub dialect: Dialect,
	pub match_mode: MatchMode,
	pub dry_run: bool,
	pub log_level: String,

	/// Config files that contributed, most specific first.
	pub sources: Vec<PathBuf>,
}

impl Default for Settings {
	fn default() -> Self {
		Settings {
			pattern: None,
			dialect: Dialect::default(),
			match_mode: MatchMode::default(),
			dry_run: false,
			log_level: DEFAULT_LOG_LEVEL.to_string(),
			sources: Vec::new(),
		}
	}
}

impl Settings {
	/// The search pattern: the command-line value, then config, then the default.
	pub fn effective_pattern(&self, cli_pattern: Option<&str>) -> String {
		cli_pattern
			.map(str::to_string)
			.or_else(|| self.pattern.clone())
			.unwrap_or_else(default_pattern)
	}

	pub fn rewriter(&self) -> Rewriter {
		Rewriter::for_dialect(self.dialect, self.match_mode)
	}
}
