pub mod config;
pub mod list;
pub mod prompts;
pub mod render;
pub mod shell;

use color_eyre::Result;
use moviemate_config::{Config, PathManager};
use std::path::{Path, PathBuf};

/// Resolve the config file to use: an explicit `--config` path or the default location.
pub fn config_path(paths: &PathManager, explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| paths.config_file())
}

/// Load the configuration, falling back to defaults when the file is missing
pub fn load_config(paths: &PathManager, explicit: Option<&Path>) -> Result<Config> {
    let path = config_path(paths, explicit);
    tracing::debug!(path = %path.display(), "Loading configuration");
    Config::load_or_default(&path)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", path.display(), e))
}
