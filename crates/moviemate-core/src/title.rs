use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// The single process-wide display label (window or page title).
pub trait DisplayLabel: Send + Sync {
    fn get(&self) -> String;
    fn set(&self, label: &str);
}

/// Label kept in memory only.
pub struct MemoryLabel {
    current: Mutex<String>,
}

impl MemoryLabel {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(initial.into()),
        }
    }
}

impl DisplayLabel for MemoryLabel {
    fn get(&self) -> String {
        self.current
            .lock()
            .map(|label| label.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn set(&self, label: &str) {
        let mut current = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = label.to_string();
    }
}

/// Sets the label for as long as the guard lives, restores the previous one on drop.
pub struct TitleGuard {
    label: Arc<dyn DisplayLabel>,
    previous: String,
}

impl TitleGuard {
    pub fn acquire(label: Arc<dyn DisplayLabel>, title: &str) -> Self {
        let previous = label.get();
        label.set(title);
        debug!("Display label set to {:?} (was {:?})", title, previous);
        Self { label, previous }
    }
}

impl Drop for TitleGuard {
    fn drop(&mut self) {
        self.label.set(&self.previous);
        debug!("Display label restored to {:?}", self.previous);
    }
}

impl fmt::Debug for TitleGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TitleGuard")
            .field("previous", &self.previous)
            .finish()
    }
}
