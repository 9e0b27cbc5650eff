use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `omdb.api_key`
pub const API_KEY_ENV: &str = "MOVIEMATE_OMDB_API_KEY";

/// Display label shown whenever no movie detail is open
pub const DEFAULT_TITLE: &str = "MovieMate";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OmdbConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Directory holding the persisted collections (defaults to the data dir)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_title")]
    pub default_title: String,
}

fn default_base_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, fall back to defaults otherwise, then apply
    /// environment overrides.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.omdb.api_key = key.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.omdb.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "omdb.api_key is required (set it in config.toml or via {})",
                API_KEY_ENV
            ));
        }
        if self.omdb.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("omdb.base_url cannot be empty"));
        }
        if self.omdb.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("omdb.timeout_seconds must be greater than zero"));
        }
        Ok(())
    }

    /// Directory for the persisted collections, preferring the configured one
    pub fn data_dir(&self, fallback: &Path) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| fallback.to_path_buf())
    }
}
