use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::error::StorageError;

/// Named-slot byte storage backing the persisted collections.
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when the slot has never been written
    fn read_named(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError>;

    fn write_named(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// One JSON file per slot inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }
}

impl KeyValueStore for FileStore {
    fn read_named(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.slot_path(name);
        if !path.exists() {
            debug!("Slot {} does not exist yet ({:?})", name, path);
            return Ok(None);
        }

        std::fs::read(&path)
            .map(Some)
            .map_err(|source| StorageError::Read {
                name: name.to_string(),
                path,
                source,
            })
    }

    fn write_named(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.slot_path(name);
        let write_err = |source| StorageError::Write {
            name: name.to_string(),
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(write_err)?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, bytes).map_err(write_err)?;
        std::fs::rename(&temp_path, &path).map_err(write_err)?;

        debug!("Wrote slot {} ({} bytes)", name, bytes.len());
        Ok(())
    }
}

/// Process-local store, used by tests and hosts without durable storage.
#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.lock().insert(name.to_string(), bytes.into());
        self
    }

    /// Raw bytes last written to a slot
    pub fn slot(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().get(name).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn read_named(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.slot(name))
    }

    fn write_named(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.lock().insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}
