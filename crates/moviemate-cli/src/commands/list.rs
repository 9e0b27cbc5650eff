use super::render;
use crate::output::Output;
use color_eyre::Result;
use moviemate_config::{Config, PathManager};
use moviemate_core::{FileStore, KeyValueStore, PersistentCollection, TO_WATCH_SLOT, WATCHED_SLOT};
use moviemate_models::WatchEntry;
use std::sync::Arc;

/// Print both collections without starting the shell. Needs no API key.
pub fn run_list(config: &Config, paths: &PathManager, output: &Output) -> Result<()> {
    let data_dir = config.data_dir(paths.data_dir());
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(data_dir));

    let watched: PersistentCollection<WatchEntry> = PersistentCollection::load(WATCHED_SLOT, store.clone());
    let to_watch: PersistentCollection<WatchEntry> = PersistentCollection::load(TO_WATCH_SLOT, store);

    render::collections(output, watched.snapshot(), to_watch.snapshot());
    Ok(())
}
