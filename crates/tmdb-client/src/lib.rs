//! TMDb metadata client for the movie recommender.
//!
//! This crate fetches display metadata (poster, IMDb id, release year,
//! genres) for a movie from The Movie Database:
//! - `TmdbClient` performs one GET per lookup, no retries
//! - `MetadataFetcher` is the seam the recommender is written against
//! - `CachedFetcher` memoizes lookups in a bounded LRU cache

pub mod cache;
pub mod details;

use async_trait::async_trait;
use data_loader::MovieId;
use reqwest::Client as HttpClient;
use thiserror::Error;
use tracing::{debug, instrument};

pub use cache::{CacheStats, CachedFetcher, DetailsCache};
pub use details::{MovieDetails, DEFAULT_IMAGE_BASE_URL, IMDB_TITLE_URL};

use details::MovieResponse;

/// TMDb v3 API root
pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Longest slice of a non-JSON error body quoted in `TmdbError::Status`
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors that can occur when fetching movie metadata
#[derive(Error, Debug)]
pub enum TmdbError {
    /// Transport-level failure (DNS, connect, TLS, body read)
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// TMDb answered with a non-success status
    #[error("TMDb returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not the JSON we expected
    #[error("Invalid response from TMDb: {0}")]
    InvalidResponse(String),
}

/// Source of movie metadata.
///
/// Implemented by `TmdbClient`; tests substitute their own.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch_details(&self, movie_id: MovieId) -> Result<MovieDetails, TmdbError>;
}

/// Connection settings for TMDb.
#[derive(Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub image_base_url: String,
}

impl TmdbConfig {
    /// Settings for the public TMDb API with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }
}

// Keep the key out of logs
impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("image_base_url", &self.image_base_url)
            .finish()
    }
}

/// HTTP client for TMDb's movie details endpoint.
#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Self {
        Self {
            http_client: HttpClient::new(),
            config,
        }
    }

    fn movie_url(&self, movie_id: MovieId) -> String {
        format!(
            "{}/movie/{}",
            self.config.api_base_url.trim_end_matches('/'),
            movie_id
        )
    }
}

/// Pull TMDb's `status_message` out of an error body.
///
/// Anything else (a proxy's HTML error page, say) is flattened onto one line
/// and cut to a short prefix before it reaches the user.
fn error_message(body: &str) -> String {
    if let Some(message) = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["status_message"].as_str().map(str::to_string))
    {
        return message;
    }

    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((end, _)) => format!("{}...", &flat[..end]),
        None => flat,
    }
}

#[async_trait]
impl MetadataFetcher for TmdbClient {
    #[instrument(skip(self))]
    async fn fetch_details(&self, movie_id: MovieId) -> Result<MovieDetails, TmdbError> {
        let url = self.movie_url(movie_id);

        // reqwest errors carry the URL, which carries the api key
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| TmdbError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TmdbError::Http(e.without_url()))?;

        if !status.is_success() {
            return Err(TmdbError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: MovieResponse =
            serde_json::from_str(&body).map_err(|e| TmdbError::InvalidResponse(e.to_string()))?;

        debug!("Fetched details for movie {}", movie_id);
        Ok(parsed.into_details(&self.config.image_base_url))
    }
}
