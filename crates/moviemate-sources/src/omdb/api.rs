use moviemate_models::{MovieDetail, MovieSummary};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SourceError;

/// OMDb marks missing fields with this literal
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
struct OmdbDetailResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Genre", default)]
    genre: String,
}

#[derive(Debug, Deserialize)]
struct OmdbErrorBody {
    #[serde(rename = "Error")]
    error: Option<String>,
}

fn is_success_flag(response: &str) -> bool {
    response.eq_ignore_ascii_case("true")
}

/// "Movie not found!" / "Series not found!" are empty results, not failures
fn is_not_found(message: &str) -> bool {
    message.to_lowercase().contains("not found")
}

fn parse_rating(raw: &str) -> Option<f32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
        return None;
    }
    trimmed.parse::<f32>().ok().filter(|r| (0.0..=10.0).contains(r))
}

async fn fetch_json<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    params: &[(&str, &str)],
) -> Result<T, SourceError> {
    let response = client.get(base_url).query(params).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        // OMDb sends a JSON error body even on 401s
        let message = serde_json::from_str::<OmdbErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| body.chars().take(200).collect());
        return Err(SourceError::Http {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))
}

/// Search OMDb by title
pub async fn search_movies(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<MovieSummary>, SourceError> {
    let raw: OmdbSearchResponse =
        fetch_json(client, base_url, &[("apikey", api_key), ("s", query)]).await?;

    if !is_success_flag(&raw.response) {
        let message = raw.error.unwrap_or_else(|| "Unknown error".to_string());
        if is_not_found(&message) {
            debug!(query, "OMDb search matched nothing");
            return Ok(Vec::new());
        }
        warn!(query, error = %message, "OMDb search failed");
        return Err(SourceError::Remote(message));
    }

    Ok(raw
        .search
        .into_iter()
        .map(|item| MovieSummary {
            id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster_url: item.poster,
        })
        .collect())
}

/// Fetch the full record for one IMDb id
pub async fn get_movie_details(
    client: &Client,
    base_url: &str,
    api_key: &str,
    id: &str,
) -> Result<MovieDetail, SourceError> {
    let raw: OmdbDetailResponse =
        fetch_json(client, base_url, &[("apikey", api_key), ("i", id)]).await?;

    if !is_success_flag(&raw.response) {
        let message = raw.error.unwrap_or_else(|| "Unknown error".to_string());
        warn!(id, error = %message, "OMDb detail lookup failed");
        return Err(SourceError::Remote(message));
    }

    Ok(MovieDetail {
        id: if raw.imdb_id.is_empty() { id.to_string() } else { raw.imdb_id },
        title: raw.title,
        year: raw.year,
        poster_url: raw.poster,
        runtime: raw.runtime,
        imdb_rating: parse_rating(&raw.imdb_rating),
        plot: raw.plot,
        release_date: raw.released,
        actors: raw.actors,
        director: raw.director,
        genre: raw.genre,
    })
}
