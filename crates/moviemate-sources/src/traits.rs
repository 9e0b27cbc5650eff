use async_trait::async_trait;
use moviemate_models::{MovieDetail, MovieSummary};

use crate::error::SourceError;

#[async_trait]
pub trait MovieCatalog: Send + Sync {
    fn catalog_name(&self) -> &str;

    /// Free-text title search.
    ///
    /// A "nothing matched" answer from the remote side is `Ok(vec![])`, not an error.
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, SourceError>;

    async fn get_movie_details(&self, id: &str) -> Result<MovieDetail, SourceError>;
}
