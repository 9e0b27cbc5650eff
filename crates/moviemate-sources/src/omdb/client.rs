use crate::error::SourceError;
use crate::omdb::api;
use crate::traits::MovieCatalog;
use async_trait::async_trait;
use moviemate_config::OmdbConfig;
use moviemate_models::{MovieDetail, MovieSummary};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the OMDb API.
///
/// The API key is plain configuration handed in at construction.
#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("moviemate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &OmdbConfig) -> Result<Self, SourceError> {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MovieCatalog for OmdbClient {
    fn catalog_name(&self) -> &str {
        "omdb"
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, SourceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        debug!(query, "Searching OMDb");
        api::search_movies(&self.client, &self.base_url, &self.api_key, query).await
    }

    async fn get_movie_details(&self, id: &str) -> Result<MovieDetail, SourceError> {
        debug!(id, "Fetching OMDb detail");
        api::get_movie_details(&self.client, &self.base_url, &self.api_key, id).await
    }
}
