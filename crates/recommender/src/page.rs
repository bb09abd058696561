//! What one recommendation request produces for the user.

use std::fmt;

use data_loader::{MovieId, Score};
use serde::Serialize;
use tmdb_client::MovieDetails;

/// A user-visible message raised while serving a request.
///
/// None of these abort the request; they are shown inline next to whatever
/// results could still be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The selected title is not in the movie list
    TitleNotFound { title: String },
    /// Metadata for a movie could not be fetched; the movie is left out
    FetchFailed { movie_id: MovieId, reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::TitleNotFound { title } => {
                write!(f, "Movie not found in database: {}", title)
            }
            Notice::FetchFailed { movie_id, reason } => {
                write!(f, "Error fetching movie details for {}: {}", movie_id, reason)
            }
        }
    }
}

/// One recommended movie with its display metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub score: Score,
    pub details: MovieDetails,
}

impl Recommendation {
    pub fn year(&self) -> Option<&str> {
        self.details.release_year.as_deref()
    }

    pub fn poster_url(&self) -> Option<&str> {
        self.details.poster_url.as_deref()
    }

    pub fn imdb_url(&self) -> Option<String> {
        self.details.imdb_url()
    }

    pub fn genres_label(&self) -> String {
        self.details.genres_label()
    }
}

/// The movie the user picked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedMovie {
    pub movie_id: MovieId,
    pub title: String,
    /// `None` when the lookup failed; the rest of the page still renders
    pub details: Option<MovieDetails>,
}

/// Everything needed to render one request: the selected movie's panel,
/// the recommendation cards and any notices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationPage {
    pub query: String,
    pub selected: Option<SelectedMovie>,
    pub recommendations: Vec<Recommendation>,
    pub notices: Vec<Notice>,
}

impl RecommendationPage {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}
