use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base directory override, used by tests and portable installs
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var("MOVIEMATE_BASE_PATH").ok().map(PathBuf::from)
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("moviemate");

        Ok(Self::from_base(base_dir))
    }

    pub fn from_base(base: PathBuf) -> Self {
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn default_log_file(&self) -> PathBuf {
        self.log_dir.join("moviemate.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = base_path_override() {
            return Self::from_base(base);
        }

        // Platform-specific paths (e.g. ~/.config/moviemate on Linux)
        Self::new().unwrap_or_else(|_| Self::from_base(PathBuf::from(".moviemate")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_base() {
        let paths = PathManager::from_base(PathBuf::from("/tmp/mm"));
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/mm/config.toml"));
        assert_eq!(paths.data_dir(), Path::new("/tmp/mm/data"));
        assert_eq!(paths.default_log_file(), PathBuf::from("/tmp/mm/logs/moviemate.log"));
    }

    #[test]
    fn test_ensure_directories_creates_tree() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::from_base(dir.path().join("mm"));
        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().is_dir());
        assert!(paths.log_dir().is_dir());
    }
}
