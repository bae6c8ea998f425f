use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, Settings};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// File name looked up in each directory of the cascade.
pub const CONFIG_FILE_NAME: &str = ".assertj-migrate.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.assertj-migrate.toml`
/// 2. Continue up the directory tree until a config with `root = true`
/// 3. Finally, check ~/.assertj-migrate.toml
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = discover_project_configs(start_dir)?;

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Walk up from `start_dir`, loading configs until one sets `root = true`.
pub fn discover_project_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();

	for dir in start_dir.ancestors() {
		let config_path = dir.join(CONFIG_FILE_NAME);
		if !config_path.is_file() {
			continue;
		}

		let config = parse_config_file(&config_path)?;
		let is_root = config.root;
		configs.push(LoadedConfig {
			config,
			path: config_path,
		});

		if is_root {
			break;
		}
	}

	Ok(configs)
}

/// Load the user's ~/.assertj-migrate.toml if it exists and wasn't already
/// picked up by the directory walk.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	let Some(user_config_path) = user_config_path() else {
		return Ok(None);
	};

	if !user_config_path.is_file()
		|| existing_configs
			.iter()
			.any(|loaded| loaded.path == user_config_path)
	{
		return Ok(None);
	}

	let config = parse_config_file(&user_config_path)?;
	Ok(Some(LoadedConfig {
		config,
		path: user_config_path,
	}))
}

/// Merge multiple configs into effective settings.
///
/// For each key, the most specific config that sets it wins.
pub fn merge_configs(configs: &[LoadedConfig]) -> Settings {
	let mut settings = Settings::default();

	// Apply least specific first so nearer configs overwrite.
	for loaded in configs.iter().rev() {
		let config = &loaded.config;
		if let Some(ref pattern) = config.pattern {
			settings.pattern = Some(pattern.clone());
		}
		if let Some(dialect) = config.dialect {
			settings.dialect = dialect;
		}
		if let Some(match_mode) = config.match_mode {
			settings.match_mode = match_mode;
		}
		if let Some(dry_run) = config.dry_run {
			settings.dry_run = dry_run;
		}
		if let Some(ref log_level) = config.log_level {
			settings.log_level = log_level.clone();
		}
	}

	settings.sources = configs.iter().map(|loaded| loaded.path.clone()).collect();
	settings
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_settings(start_dir: &Path) -> Result<Settings> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file, if there is a home directory.
pub fn user_config_path() -> Option<PathBuf> {
	dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}
