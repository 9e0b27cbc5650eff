use std::sync::Arc;

use moviemate_models::{MovieDetail, WatchEntry};
use moviemate_sources::SourceError;
use tracing::debug;

use crate::collection::PersistentCollection;
use crate::title::{DisplayLabel, TitleGuard};

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Loading { id: String },
    Loaded(MovieDetail),
    Failed { id: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub generation: u64,
    pub id: String,
}

/// Detail fetch for the current selection.
///
/// While the state is `Loaded` the display label shows the movie title. The
/// label is restored exactly once whenever the state leaves `Loaded`,
/// including when the session itself is dropped.
pub struct DetailSession {
    label: Arc<dyn DisplayLabel>,
    generation: u64,
    state: DetailState,
    title_guard: Option<TitleGuard>,
}

impl DetailSession {
    pub fn new(label: Arc<dyn DisplayLabel>) -> Self {
        Self {
            label,
            generation: 0,
            state: DetailState::Idle,
            title_guard: None,
        }
    }

    /// Change the selection. Returns the fetch to dispatch for a non-empty selection.
    pub fn select(&mut self, id: Option<&str>) -> Option<DetailRequest> {
        self.generation += 1;
        match id {
            None => {
                debug!("Selection cleared");
                self.transition(DetailState::Idle);
                None
            }
            Some(id) => {
                debug!(generation = self.generation, id, "Detail fetch dispatched");
                self.transition(DetailState::Loading { id: id.to_string() });
                Some(DetailRequest {
                    generation: self.generation,
                    id: id.to_string(),
                })
            }
        }
    }

    /// Apply a finished fetch. Returns `false` for results of a superseded selection.
    pub fn complete(&mut self, generation: u64, outcome: Result<MovieDetail, SourceError>) -> bool {
        let id = match &self.state {
            DetailState::Loading { id } if generation == self.generation => id.clone(),
            _ => {
                debug!(generation, current = self.generation, "Dropping stale detail result");
                return false;
            }
        };

        match outcome {
            Ok(detail) => {
                debug!(id = %id, title = %detail.title, "Detail loaded");
                self.transition(DetailState::Loaded(detail));
            }
            Err(e) => {
                debug!(id = %id, error = %e, "Detail fetch failed");
                self.transition(DetailState::Failed {
                    id,
                    message: e.to_string(),
                });
            }
        }
        true
    }

    fn transition(&mut self, next: DetailState) {
        // Release the title of the previous Loaded state before anything else
        self.title_guard = None;
        self.state = next;
        if let DetailState::Loaded(detail) = &self.state {
            self.title_guard = Some(TitleGuard::acquire(self.label.clone(), &detail.title));
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn selected_id(&self) -> Option<&str> {
        match &self.state {
            DetailState::Idle => None,
            DetailState::Loading { id } | DetailState::Failed { id, .. } => Some(id),
            DetailState::Loaded(detail) => Some(&detail.id),
        }
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        match &self.state {
            DetailState::Loaded(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DetailState::Loading { .. })
    }

    /// Whether the current selection is already in `watched`
    pub fn is_already_watched(&self, watched: &PersistentCollection<WatchEntry>) -> bool {
        self.selected_id().is_some_and(|id| watched.contains(id))
    }
}
