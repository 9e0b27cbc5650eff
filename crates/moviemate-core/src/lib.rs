pub mod collection;
pub mod controller;
pub mod detail;
pub mod error;
pub mod keymap;
pub mod search;
pub mod storage;
pub mod summary;
pub mod title;

pub use collection::{PersistentCollection, TO_WATCH_SLOT, WATCHED_SLOT};
pub use controller::{CatalogController, SessionUpdate, ViewCommand};
pub use detail::{DetailRequest, DetailSession, DetailState};
pub use error::{CatalogError, StorageError};
pub use keymap::{FocusProbe, Key, KeyBinding, Keymap};
pub use search::{SearchRequest, SearchSession, SearchState};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use summary::{result_count_line, watch_list_line, WatchedSummary};
pub use title::{DisplayLabel, MemoryLabel, TitleGuard};
