use serde::{Deserialize, Serialize};

/// One row of a search result list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: String, // Remote catalog key (IMDb id, e.g. "tt0111161")
    pub title: String,
    pub year: String, // Free-form, series report ranges like "2011–2019"
    pub poster_url: String,
}

/// Full detail record for a single title.
///
/// `runtime` keeps the text exactly as the catalog reports it ("142 min", "N/A");
/// it is only parsed when a watch entry is derived from the detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub runtime: String,
    /// 0-10, `None` when the catalog has no rating yet
    pub imdb_rating: Option<f32>,
    pub plot: String,
    pub release_date: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

impl MovieDetail {
    /// Parse the leading token of the runtime text as whole minutes.
    ///
    /// Returns `None` for anything that does not start with an unsigned integer,
    /// which includes the catalog's "N/A" placeholder.
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<u32>().ok())
    }
}
