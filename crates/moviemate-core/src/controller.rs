use std::sync::Arc;

use moviemate_models::{MovieDetail, MovieSummary, WatchEntry};
use moviemate_sources::{MovieCatalog, SourceError};
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::collection::{PersistentCollection, TO_WATCH_SLOT, WATCHED_SLOT};
use crate::detail::{DetailRequest, DetailSession, DetailState};
use crate::error::CatalogError;
use crate::keymap::{FocusProbe, Key, KeyBinding, Keymap};
use crate::search::{SearchRequest, SearchSession, SearchState};
use crate::storage::KeyValueStore;
use crate::summary::WatchedSummary;
use crate::title::DisplayLabel;

/// Outcome of a spawned fetch, tagged with the generation it was dispatched under.
#[derive(Debug)]
pub enum SessionUpdate {
    Search {
        generation: u64,
        outcome: Result<Vec<MovieSummary>, SourceError>,
    },
    Detail {
        generation: u64,
        outcome: Result<MovieDetail, SourceError>,
    },
}

/// View-level actions raised by key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    CloseDetail,
    /// Clear the query and move focus to the search input
    FocusSearch,
}

/// Owns the query, the selection and both personal collections.
///
/// Fetches run as spawned tasks on the current tokio runtime and report back
/// through [`CatalogController::next_update`]; each session applies only the
/// outcome of its most recent request.
pub struct CatalogController {
    catalog: Arc<dyn MovieCatalog>,
    watched: PersistentCollection<WatchEntry>,
    to_watch: PersistentCollection<WatchEntry>,
    search: SearchSession,
    detail: DetailSession,
    keymap: Keymap,
    view_tx: mpsc::UnboundedSender<ViewCommand>,
    view_rx: mpsc::UnboundedReceiver<ViewCommand>,
    updates_tx: mpsc::UnboundedSender<SessionUpdate>,
    updates_rx: mpsc::UnboundedReceiver<SessionUpdate>,
    in_flight: usize,
    _focus_search_key: KeyBinding,
    // Present exactly while something is selected
    close_detail_key: Option<KeyBinding>,
}

impl CatalogController {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        store: Arc<dyn KeyValueStore>,
        label: Arc<dyn DisplayLabel>,
        keymap: Keymap,
    ) -> Self {
        let (view_tx, view_rx) = mpsc::unbounded_channel();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();

        let focus_tx = view_tx.clone();
        let focus_search_key = keymap.bind_guarded(
            Key::Enter,
            |focus| !focus.text_input_focused(),
            move || {
                let _ = focus_tx.send(ViewCommand::FocusSearch);
            },
        );

        let watched = PersistentCollection::load(WATCHED_SLOT, store.clone());
        let to_watch = PersistentCollection::load(TO_WATCH_SLOT, store);
        info!(
            catalog = catalog.catalog_name(),
            watched = watched.len(),
            to_watch = to_watch.len(),
            "Catalog controller ready"
        );

        Self {
            catalog,
            watched,
            to_watch,
            search: SearchSession::new(),
            detail: DetailSession::new(label),
            keymap,
            view_tx,
            view_rx,
            updates_tx,
            updates_rx,
            in_flight: 0,
            _focus_search_key: focus_search_key,
            close_detail_key: None,
        }
    }

    // Query and selection

    pub fn set_query(&mut self, query: &str) {
        if let Some(request) = self.search.set_query(query) {
            self.dispatch_search(request);
        }
    }

    /// Re-run the current query
    pub fn refresh_search(&mut self) {
        if let Some(request) = self.search.refresh() {
            self.dispatch_search(request);
        }
    }

    pub fn select(&mut self, id: Option<&str>) {
        match self.detail.select(id) {
            Some(request) => {
                self.bind_close_detail();
                self.dispatch_detail(request);
            }
            None => {
                self.close_detail_key = None;
            }
        }
    }

    /// Selecting the already-selected id closes it
    pub fn toggle_selection(&mut self, id: &str) {
        if self.detail.selected_id() == Some(id) {
            self.select(None);
        } else {
            self.select(Some(id));
        }
    }

    pub fn close_detail(&mut self) {
        self.select(None);
    }

    fn bind_close_detail(&mut self) {
        if self.close_detail_key.is_some() {
            return;
        }
        let tx = self.view_tx.clone();
        self.close_detail_key = Some(self.keymap.bind(Key::Escape, move || {
            let _ = tx.send(ViewCommand::CloseDetail);
        }));
    }

    fn dispatch_search(&mut self, request: SearchRequest) {
        let catalog = self.catalog.clone();
        let tx = self.updates_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let outcome = catalog.search_movies(&request.query).await;
            let _ = tx.send(SessionUpdate::Search {
                generation: request.generation,
                outcome,
            });
        });
    }

    fn dispatch_detail(&mut self, request: DetailRequest) {
        let catalog = self.catalog.clone();
        let tx = self.updates_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let outcome = catalog.get_movie_details(&request.id).await;
            let _ = tx.send(SessionUpdate::Detail {
                generation: request.generation,
                outcome,
            });
        });
    }

    // Fetch results

    /// Wait for the next fetch to finish and apply it.
    ///
    /// Returns `None` when nothing is in flight, otherwise whether the outcome
    /// changed visible state (`false` for a superseded request).
    pub async fn next_update(&mut self) -> Option<bool> {
        if self.in_flight == 0 {
            return None;
        }
        let update = self.updates_rx.recv().await?;
        self.in_flight -= 1;
        Some(self.apply(update))
    }

    /// Apply every outstanding fetch
    pub async fn settle(&mut self) {
        while self.next_update().await.is_some() {}
    }

    pub fn apply(&mut self, update: SessionUpdate) -> bool {
        match update {
            SessionUpdate::Search { generation, outcome } => self.search.complete(generation, outcome),
            SessionUpdate::Detail { generation, outcome } => self.detail.complete(generation, outcome),
        }
    }

    pub fn pending_fetches(&self) -> usize {
        self.in_flight
    }

    // Keyboard

    /// Deliver a key press to the bindings and carry out the commands they raise.
    pub fn press_key(&mut self, key: &Key, focus: &dyn FocusProbe) -> Vec<ViewCommand> {
        let fired = self.keymap.dispatch(key, focus);
        trace!(?key, fired, "Key dispatched");
        self.process_view_commands()
    }

    /// Carry out commands raised by bindings dispatched through a shared keymap.
    pub fn process_view_commands(&mut self) -> Vec<ViewCommand> {
        let mut handled = Vec::new();
        while let Ok(command) = self.view_rx.try_recv() {
            debug!(?command, "Handling view command");
            match command {
                ViewCommand::CloseDetail => self.close_detail(),
                ViewCommand::FocusSearch => self.set_query(""),
            }
            handled.push(command);
        }
        handled
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    // Collection commands

    /// Move a movie to the watched list with the user's rating.
    ///
    /// Touches both collections in one step: the entry is added to watched and
    /// removed from to-watch. Already-watched movies only get the removal.
    pub fn commit_watched(&mut self, detail: &MovieDetail, user_rating: u8) -> Result<bool, CatalogError> {
        if self.watched.contains(&detail.id) {
            debug!(id = %detail.id, "Already watched, not adding again");
            self.to_watch.remove(&detail.id);
            return Ok(false);
        }

        let entry = watch_entry_from(detail, Some(user_rating))?;
        self.watched.add(entry);
        self.to_watch.remove(&detail.id);
        info!(id = %detail.id, title = %detail.title, user_rating, "Marked as watched");
        Ok(true)
    }

    /// Add a movie to the to-watch list. No-op for movies already watched.
    pub fn commit_to_watch(&mut self, detail: &MovieDetail) -> Result<bool, CatalogError> {
        if self.watched.contains(&detail.id) || self.to_watch.contains(&detail.id) {
            debug!(id = %detail.id, "Already listed, ignoring to-watch add");
            return Ok(false);
        }

        let entry = watch_entry_from(detail, None)?;
        let added = self.to_watch.add(entry);
        info!(id = %detail.id, title = %detail.title, "Added to watch list");
        Ok(added)
    }

    pub fn delete_watched(&mut self, id: &str) -> bool {
        self.watched.remove(id)
    }

    pub fn delete_to_watch(&mut self, id: &str) -> bool {
        self.to_watch.remove(id)
    }

    /// `commit_watched` for the loaded detail, then close the detail view
    pub fn commit_selected_watched(&mut self, user_rating: u8) -> Result<bool, CatalogError> {
        let detail = self.detail.detail().cloned().ok_or(CatalogError::NoDetailLoaded)?;
        let added = self.commit_watched(&detail, user_rating)?;
        self.close_detail();
        Ok(added)
    }

    pub fn commit_selected_to_watch(&mut self) -> Result<bool, CatalogError> {
        let detail = self.detail.detail().cloned().ok_or(CatalogError::NoDetailLoaded)?;
        self.commit_to_watch(&detail)
    }

    // Read side

    pub fn query(&self) -> &str {
        self.search.query()
    }

    pub fn search_state(&self) -> &SearchState {
        self.search.state()
    }

    pub fn results(&self) -> &[MovieSummary] {
        self.search.results()
    }

    pub fn detail_state(&self) -> &DetailState {
        self.detail.state()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.detail.selected_id()
    }

    pub fn selected_detail(&self) -> Option<&MovieDetail> {
        self.detail.detail()
    }

    pub fn is_selected_watched(&self) -> bool {
        self.detail.is_already_watched(&self.watched)
    }

    pub fn watched(&self) -> &PersistentCollection<WatchEntry> {
        &self.watched
    }

    pub fn to_watch(&self) -> &PersistentCollection<WatchEntry> {
        &self.to_watch
    }

    pub fn watched_summary(&self) -> WatchedSummary {
        WatchedSummary::from_entries(self.watched.snapshot())
    }
}

/// Build the stored entry for a detail record
pub fn watch_entry_from(detail: &MovieDetail, user_rating: Option<u8>) -> Result<WatchEntry, CatalogError> {
    let runtime_minutes = detail
        .runtime_minutes()
        .ok_or_else(|| CatalogError::InvalidDurationFormat {
            id: detail.id.clone(),
            runtime: detail.runtime.clone(),
        })?;

    Ok(WatchEntry {
        id: detail.id.clone(),
        poster_url: detail.poster_url.clone(),
        title: detail.title.clone(),
        year: detail.year.clone(),
        imdb_rating: detail.imdb_rating,
        runtime_minutes,
        user_rating,
    })
}

#[cfg(test)]
mod tests;
