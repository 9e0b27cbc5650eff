use moviemate_models::MovieSummary;
use moviemate_sources::SourceError;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// Empty query, nothing requested
    Idle,
    Loading,
    Success(Vec<MovieSummary>),
    Failure(String),
}

/// A fetch the session wants dispatched. `generation` must be handed back on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
}

/// Query-driven search where only the most recent request may change state.
#[derive(Debug)]
pub struct SearchSession {
    query: String,
    generation: u64,
    state: SearchState,
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            generation: 0,
            state: SearchState::Idle,
        }
    }

    /// Record a new query. Returns the request to dispatch, or `None` when the
    /// query is unchanged or blank.
    pub fn set_query(&mut self, query: &str) -> Option<SearchRequest> {
        if query == self.query {
            return None;
        }
        self.query = query.to_string();
        self.issue()
    }

    /// Re-issue the current query, e.g. after a failure
    pub fn refresh(&mut self) -> Option<SearchRequest> {
        self.issue()
    }

    fn issue(&mut self) -> Option<SearchRequest> {
        // Any outstanding request is superseded from here on
        self.generation += 1;

        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            debug!("Search query cleared");
            self.state = SearchState::Idle;
            return None;
        }

        debug!(generation = self.generation, query = trimmed, "Search dispatched");
        self.state = SearchState::Loading;
        Some(SearchRequest {
            generation: self.generation,
            query: trimmed.to_string(),
        })
    }

    /// Apply a finished fetch. Returns `false` when the outcome belongs to a superseded request.
    pub fn complete(
        &mut self,
        generation: u64,
        outcome: Result<Vec<MovieSummary>, SourceError>,
    ) -> bool {
        if generation != self.generation || self.state != SearchState::Loading {
            debug!(
                generation,
                current = self.generation,
                "Dropping stale search result"
            );
            return false;
        }

        self.state = match outcome {
            Ok(results) => {
                debug!(generation, count = results.len(), "Search succeeded");
                SearchState::Success(results)
            }
            Err(e) => {
                debug!(generation, error = %e, "Search failed");
                SearchState::Failure(e.to_string())
            }
        };
        true
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current results; empty unless the last search succeeded
    pub fn results(&self) -> &[MovieSummary] {
        match &self.state {
            SearchState::Success(results) => results,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == SearchState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SearchState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}
