use std::collections::HashSet;
use std::sync::Arc;

use moviemate_models::Keyed;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::storage::KeyValueStore;

/// Slot holding movies the user has seen
pub const WATCHED_SLOT: &str = "watched";

/// Slot holding movies the user wants to see
pub const TO_WATCH_SLOT: &str = "to-watch";

/// Insertion-ordered, id-unique list mirrored to a named storage slot.
///
/// The in-memory list is authoritative. Every mutation rewrites the whole slot;
/// a failed write is logged and not retried.
pub struct PersistentCollection<T> {
    name: String,
    items: Vec<T>,
    store: Arc<dyn KeyValueStore>,
}

impl<T> PersistentCollection<T>
where
    T: Keyed + Serialize + DeserializeOwned,
{
    /// Load the slot once. Absent, unreadable or malformed data yields an empty collection.
    pub fn load(name: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        let name = name.into();
        let items = match store.read_named(&name) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<T>>(&bytes) {
                Ok(items) => dedupe(items),
                Err(e) => {
                    warn!(
                        "Stored data for {} is malformed: {}. Starting with an empty collection.",
                        name, e
                    );
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No stored data for {}, starting empty", name);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read {}: {}. Starting with an empty collection.", name, e);
                Vec::new()
            }
        };

        info!("Loaded collection {} ({} items)", name, items.len());
        Self { name, items, store }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append unless the id is already present. Returns whether anything changed.
    pub fn add(&mut self, item: T) -> bool {
        if self.contains(item.id()) {
            debug!("{} already contains {}, ignoring add", self.name, item.id());
            return false;
        }
        self.items.push(item);
        self.persist();
        true
    }

    /// Remove the item with this id if present. Returns whether anything changed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn snapshot(&self) -> &[T] {
        &self.items
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn persist(&self) {
        let bytes = match serde_json::to_vec(&self.items) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to serialize {}: {}", self.name, e);
                return;
            }
        };
        if let Err(e) = self.store.write_named(&self.name, &bytes) {
            warn!("Failed to persist {}: {}", self.name, e);
        }
    }
}

/// Keep the first occurrence of each id
fn dedupe<T: Keyed>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let total = items.len();
    let unique: Vec<T> = items
        .into_iter()
        .filter(|item| seen.insert(item.id().to_string()))
        .collect();
    if unique.len() != total {
        debug!("Dropped {} duplicate stored entries", total - unique.len());
    }
    unique
}
