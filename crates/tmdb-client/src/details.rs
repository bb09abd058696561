//! Movie metadata as returned by TMDb and as shown on the page.

use serde::{Deserialize, Serialize};

/// Base URL for w500 poster images; `poster_path` is appended as-is
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Base URL for IMDb title pages
pub const IMDB_TITLE_URL: &str = "https://www.imdb.com/title";

/// Display metadata for one movie.
///
/// TMDb leaves any of these fields null for obscure titles, so every field
/// is optional and genres may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub poster_url: Option<String>,
    pub imdb_id: Option<String>,
    pub release_year: Option<String>,
    pub genres: Vec<String>,
}

impl MovieDetails {
    /// Link to the movie's IMDb page, when TMDb knows the IMDb id
    pub fn imdb_url(&self) -> Option<String> {
        self.imdb_id
            .as_deref()
            .map(|id| format!("{}/{}", IMDB_TITLE_URL, id))
    }

    /// Genres joined for display, e.g. "Action, Adventure"
    pub fn genres_label(&self) -> String {
        self.genres.join(", ")
    }
}

/// The subset of TMDb's `/movie/{id}` payload we read
#[derive(Debug, Deserialize)]
pub(crate) struct MovieResponse {
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    imdb_id: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    genres: Option<Vec<GenreResponse>>,
}

#[derive(Debug, Deserialize)]
struct GenreResponse {
    name: String,
}

impl MovieResponse {
    pub(crate) fn into_details(self, image_base_url: &str) -> MovieDetails {
        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());

        MovieDetails {
            poster_url: non_empty(self.poster_path)
                .map(|path| format!("{}{}", image_base_url, path)),
            imdb_id: non_empty(self.imdb_id),
            release_year: non_empty(self.release_date).map(|d| d.chars().take(4).collect()),
            genres: self
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.name)
                .collect(),
        }
    }
}
