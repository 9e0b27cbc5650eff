pub mod config;
pub mod paths;

pub use config::{Config, DisplayConfig, OmdbConfig, StorageConfig, API_KEY_ENV, DEFAULT_TITLE};
pub use paths::{base_path_override, PathManager};
