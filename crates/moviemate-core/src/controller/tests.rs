use super::*;
use crate::storage::MemoryStore;
use crate::title::MemoryLabel;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

type SearchOutcome = Result<Vec<MovieSummary>, SourceError>;
type DetailOutcome = Result<MovieDetail, SourceError>;

/// Catalog whose answers can be held back until the test releases them
#[derive(Default)]
struct GatedCatalog {
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    search_gates: Mutex<HashMap<String, oneshot::Receiver<SearchOutcome>>>,
    detail_gates: Mutex<HashMap<String, oneshot::Receiver<DetailOutcome>>>,
    details: Mutex<HashMap<String, MovieDetail>>,
}

impl GatedCatalog {
    fn gate_search(&self, query: &str) -> oneshot::Sender<SearchOutcome> {
        let (tx, rx) = oneshot::channel();
        self.search_gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    fn gate_detail(&self, id: &str) -> oneshot::Sender<DetailOutcome> {
        let (tx, rx) = oneshot::channel();
        self.detail_gates.lock().unwrap().insert(id.to_string(), rx);
        tx
    }

    fn with_detail(self, detail: MovieDetail) -> Self {
        self.details.lock().unwrap().insert(detail.id.clone(), detail);
        self
    }
}

#[async_trait]
impl MovieCatalog for GatedCatalog {
    fn catalog_name(&self) -> &str {
        "gated"
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, SourceError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.search_gates.lock().unwrap().remove(query);
        match gate {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(SourceError::remote("gate dropped"))),
            None => Ok(vec![summary(&format!("tt-{}", query), query)]),
        }
    }

    async fn get_movie_details(&self, id: &str) -> Result<MovieDetail, SourceError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.detail_gates.lock().unwrap().remove(id);
        if let Some(rx) = gate {
            return rx.await.unwrap_or_else(|_| Err(SourceError::remote("gate dropped")));
        }
        let known = self.details.lock().unwrap().get(id).cloned();
        known.ok_or_else(|| SourceError::remote("Incorrect IMDb ID."))
    }
}

fn summary(id: &str, title: &str) -> MovieSummary {
    MovieSummary {
        id: id.to_string(),
        title: title.to_string(),
        year: "1995".to_string(),
        poster_url: String::new(),
    }
}

fn detail(id: &str, title: &str, runtime: &str, imdb_rating: f32) -> MovieDetail {
    MovieDetail {
        id: id.to_string(),
        title: title.to_string(),
        year: "1995".to_string(),
        poster_url: format!("https://img/{}.jpg", id),
        runtime: runtime.to_string(),
        imdb_rating: Some(imdb_rating),
        plot: String::new(),
        release_date: String::new(),
        actors: String::new(),
        director: String::new(),
        genre: String::new(),
    }
}

struct Harness {
    catalog: Arc<GatedCatalog>,
    store: Arc<MemoryStore>,
    label: Arc<MemoryLabel>,
    controller: CatalogController,
}

fn harness_with(catalog: GatedCatalog, store: MemoryStore) -> Harness {
    let catalog = Arc::new(catalog);
    let store = Arc::new(store);
    let label = Arc::new(MemoryLabel::new("MovieMate"));
    let controller = CatalogController::new(
        catalog.clone(),
        store.clone(),
        label.clone(),
        Keymap::new(),
    );
    Harness {
        catalog,
        store,
        label,
        controller,
    }
}

fn harness() -> Harness {
    harness_with(GatedCatalog::default(), MemoryStore::new())
}

fn ids(entries: &[WatchEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.id.as_str()).collect()
}

#[tokio::test]
async fn test_empty_query_dispatches_nothing() {
    let mut h = harness();

    h.controller.set_query("");
    h.controller.set_query("   ");
    tokio::task::yield_now().await;

    assert_eq!(h.controller.pending_fetches(), 0);
    assert_eq!(h.catalog.search_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.controller.search_state(), &SearchState::Idle);
    assert!(h.controller.results().is_empty());
}

#[tokio::test]
async fn test_latest_query_wins_regardless_of_resolution_order() {
    let mut h = harness();
    let gate_h = h.catalog.gate_search("h");
    let gate_he = h.catalog.gate_search("he");
    let gate_heat = h.catalog.gate_search("heat");

    h.controller.set_query("h");
    h.controller.set_query("he");
    h.controller.set_query("heat");
    assert_eq!(h.controller.pending_fetches(), 3);

    // An older query resolving first never becomes visible
    gate_h.send(Ok(vec![summary("tt1", "H")])).unwrap();
    assert_eq!(h.controller.next_update().await, Some(false));
    assert_eq!(h.controller.search_state(), &SearchState::Loading);

    gate_heat.send(Ok(vec![summary("tt3", "Heat")])).unwrap();
    assert_eq!(h.controller.next_update().await, Some(true));

    // Nor does one resolving after the latest
    gate_he.send(Ok(vec![summary("tt2", "He")])).unwrap();
    assert_eq!(h.controller.next_update().await, Some(false));

    assert_eq!(h.controller.results(), &[summary("tt3", "Heat")]);
    assert_eq!(h.controller.next_update().await, None);
    assert_eq!(h.catalog.search_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_clearing_query_drops_in_flight_search() {
    let mut h = harness();
    let gate = h.catalog.gate_search("heat");

    h.controller.set_query("heat");
    h.controller.set_query("");
    gate.send(Ok(vec![summary("tt1", "Heat")])).unwrap();

    assert_eq!(h.controller.next_update().await, Some(false));
    assert_eq!(h.controller.search_state(), &SearchState::Idle);
}

#[tokio::test]
async fn test_search_failure_does_not_touch_detail() {
    let mut h = harness_with(
        GatedCatalog::default().with_detail(detail("tt1", "Heat", "170 min", 8.3)),
        MemoryStore::new(),
    );
    h.controller.select(Some("tt1"));
    h.controller.settle().await;

    let gate = h.catalog.gate_search("heat");
    h.controller.set_query("heat");
    gate.send(Err(SourceError::remote("Too many results."))).unwrap();
    h.controller.settle().await;

    assert_eq!(
        h.controller.search_state(),
        &SearchState::Failure("Too many results.".to_string())
    );
    assert_eq!(h.controller.selected_detail().map(|d| d.title.as_str()), Some("Heat"));
    assert_eq!(h.label.get(), "Heat");
}

#[tokio::test]
async fn test_superseded_selection_never_shows() {
    let mut h = harness();
    let gate_1 = h.catalog.gate_detail("tt1");
    let gate_2 = h.catalog.gate_detail("tt2");

    h.controller.select(Some("tt1"));
    h.controller.select(Some("tt2"));

    gate_1.send(Ok(detail("tt1", "Heat", "170 min", 8.3))).unwrap();
    assert_eq!(h.controller.next_update().await, Some(false));
    assert_eq!(
        h.controller.detail_state(),
        &DetailState::Loading { id: "tt2".to_string() }
    );
    assert_eq!(h.label.get(), "MovieMate");

    gate_2.send(Ok(detail("tt2", "Ronin", "122 min", 7.2))).unwrap();
    assert_eq!(h.controller.next_update().await, Some(true));
    assert_eq!(h.controller.selected_id(), Some("tt2"));
    assert_eq!(h.label.get(), "Ronin");
}

#[tokio::test]
async fn test_to_watch_then_watched_moves_entry() {
    let mut h = harness();
    let movie = detail("tt1", "A", "100 min", 7.1);

    assert_eq!(h.controller.commit_to_watch(&movie), Ok(true));
    assert_eq!(ids(h.controller.to_watch().snapshot()), vec!["tt1"]);
    assert_eq!(h.controller.to_watch().snapshot()[0].user_rating, None);
    assert_eq!(h.controller.to_watch().snapshot()[0].runtime_minutes, 100);

    assert_eq!(h.controller.commit_watched(&movie, 8), Ok(true));
    assert_eq!(h.controller.watched().len(), 1);
    assert_eq!(h.controller.watched().snapshot()[0].user_rating, Some(8));
    assert_eq!(h.controller.watched().snapshot()[0].imdb_rating, Some(7.1));
    assert!(h.controller.to_watch().is_empty());

    // Both slots were rewritten
    let reloaded_to_watch: PersistentCollection<WatchEntry> =
        PersistentCollection::load(TO_WATCH_SLOT, h.store.clone());
    let reloaded_watched: PersistentCollection<WatchEntry> =
        PersistentCollection::load(WATCHED_SLOT, h.store.clone());
    assert!(reloaded_to_watch.is_empty());
    assert_eq!(ids(reloaded_watched.snapshot()), vec!["tt1"]);
}

#[tokio::test]
async fn test_commit_watched_twice_keeps_first_rating() {
    let mut h = harness();
    let movie = detail("tt1", "A", "100 min", 7.1);

    assert_eq!(h.controller.commit_watched(&movie, 8), Ok(true));
    assert_eq!(h.controller.commit_watched(&movie, 3), Ok(false));

    assert_eq!(h.controller.watched().len(), 1);
    assert_eq!(h.controller.watched().snapshot()[0].user_rating, Some(8));
}

#[tokio::test]
async fn test_malformed_runtime_is_reported_and_nothing_persists() {
    let mut h = harness();
    let listed = detail("tt1", "A", "100 min", 7.1);
    h.controller.commit_to_watch(&listed).unwrap();

    let broken = detail("tt1", "A", "N/A", 7.1);
    let err = h.controller.commit_watched(&broken, 8).unwrap_err();

    assert_eq!(
        err,
        CatalogError::InvalidDurationFormat {
            id: "tt1".to_string(),
            runtime: "N/A".to_string()
        }
    );
    assert!(h.controller.watched().is_empty());
    assert_eq!(ids(h.controller.to_watch().snapshot()), vec!["tt1"]);
    assert!(h.store.slot(WATCHED_SLOT).is_none());
}

#[tokio::test]
async fn test_to_watch_is_noop_when_already_watched() {
    let mut h = harness();
    let movie = detail("tt1", "A", "100 min", 7.1);
    h.controller.commit_watched(&movie, 9).unwrap();

    assert_eq!(h.controller.commit_to_watch(&movie), Ok(false));
    assert!(h.controller.to_watch().is_empty());
}

#[tokio::test]
async fn test_deleting_missing_ids_is_noop() {
    let mut h = harness();
    h.controller.commit_to_watch(&detail("tt1", "A", "100 min", 7.1)).unwrap();
    let before = h.controller.to_watch().snapshot().to_vec();

    assert!(!h.controller.delete_to_watch("tt404"));
    assert!(!h.controller.delete_watched("tt404"));

    assert_eq!(h.controller.to_watch().snapshot(), before.as_slice());
    assert!(h.controller.watched().is_empty());
    assert!(h.controller.delete_to_watch("tt1"));
}

#[tokio::test]
async fn test_collections_are_loaded_at_startup() {
    let stored = serde_json::to_vec(&vec![
        watch_entry_from(&detail("tt9", "Stored", "95 min", 6.5), Some(7)).unwrap(),
    ])
    .unwrap();
    let h = harness_with(
        GatedCatalog::default(),
        MemoryStore::new()
            .with_slot(WATCHED_SLOT, stored)
            .with_slot(TO_WATCH_SLOT, "garbage"),
    );

    assert_eq!(ids(h.controller.watched().snapshot()), vec!["tt9"]);
    assert!(h.controller.to_watch().is_empty());
    assert_eq!(h.controller.watched_summary().avg_user_rating, 7.0);
}

#[tokio::test]
async fn test_escape_binding_lives_only_while_selected() {
    let mut h = harness_with(
        GatedCatalog::default().with_detail(detail("tt1", "Heat", "170 min", 8.3)),
        MemoryStore::new(),
    );
    assert_eq!(h.controller.keymap().bound_count(&Key::Escape), 0);
    assert!(h.controller.press_key(&Key::Escape, &false).is_empty());

    h.controller.select(Some("tt1"));
    h.controller.settle().await;
    assert_eq!(h.controller.keymap().bound_count(&Key::Escape), 1);
    assert_eq!(h.label.get(), "Heat");

    assert_eq!(
        h.controller.press_key(&Key::Escape, &false),
        vec![ViewCommand::CloseDetail]
    );
    assert_eq!(h.controller.selected_id(), None);
    assert_eq!(h.controller.keymap().bound_count(&Key::Escape), 0);
    assert_eq!(h.label.get(), "MovieMate");
}

#[tokio::test]
async fn test_enter_clears_query_unless_typing() {
    let mut h = harness();
    h.controller.set_query("heat");
    h.controller.settle().await;
    assert_eq!(h.controller.results().len(), 1);

    assert!(h.controller.press_key(&Key::Enter, &true).is_empty());
    assert_eq!(h.controller.query(), "heat");

    assert_eq!(
        h.controller.press_key(&Key::Enter, &false),
        vec![ViewCommand::FocusSearch]
    );
    assert_eq!(h.controller.query(), "");
    assert_eq!(h.controller.search_state(), &SearchState::Idle);
}

#[tokio::test]
async fn test_toggle_selection() {
    let mut h = harness_with(
        GatedCatalog::default().with_detail(detail("tt1", "Heat", "170 min", 8.3)),
        MemoryStore::new(),
    );

    h.controller.toggle_selection("tt1");
    assert_eq!(h.controller.selected_id(), Some("tt1"));
    h.controller.toggle_selection("tt1");
    assert_eq!(h.controller.selected_id(), None);

    // The fetch for the closed selection is discarded
    h.controller.settle().await;
    assert_eq!(h.controller.detail_state(), &DetailState::Idle);
    assert_eq!(h.label.get(), "MovieMate");
}

#[tokio::test]
async fn test_commit_selected_watched_closes_detail() {
    let mut h = harness_with(
        GatedCatalog::default().with_detail(detail("tt1", "Heat", "170 min", 8.3)),
        MemoryStore::new(),
    );
    assert_eq!(h.controller.commit_selected_watched(7), Err(CatalogError::NoDetailLoaded));

    h.controller.select(Some("tt1"));
    h.controller.settle().await;
    assert!(!h.controller.is_selected_watched());

    assert_eq!(h.controller.commit_selected_watched(7), Ok(true));
    assert_eq!(h.controller.selected_id(), None);
    assert_eq!(h.label.get(), "MovieMate");

    h.controller.select(Some("tt1"));
    h.controller.settle().await;
    assert!(h.controller.is_selected_watched());
    assert_eq!(h.controller.commit_selected_to_watch(), Ok(false));
}

#[tokio::test]
async fn test_detail_failure_is_scoped_to_detail() {
    let mut h = harness();
    h.controller.set_query("heat");
    h.controller.select(Some("tt404"));
    h.controller.settle().await;

    assert!(matches!(h.controller.detail_state(), DetailState::Failed { .. }));
    assert_eq!(h.controller.results().len(), 1);
    assert_eq!(h.catalog.detail_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_dropping_controller_restores_title() {
    let mut h = harness_with(
        GatedCatalog::default().with_detail(detail("tt1", "Heat", "170 min", 8.3)),
        MemoryStore::new(),
    );
    h.controller.select(Some("tt1"));
    h.controller.settle().await;
    assert_eq!(h.label.get(), "Heat");

    let Harness { label, controller, .. } = h;
    drop(controller);
    assert_eq!(label.get(), "MovieMate");
}
