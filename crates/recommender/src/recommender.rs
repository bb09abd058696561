//! # Recommender
//!
//! Serves one request in three steps:
//! 1. Resolve the selected title to a row of the similarity matrix
//! 2. Rank the row and keep the 8 closest other movies
//! 3. Enrich each with TMDb metadata, skipping movies whose lookup fails
//!
//! Lookups run one after another; a full page costs at most 9 requests and
//! repeat requests are answered from the fetcher's cache.

use std::sync::Arc;
use std::time::Instant;

use data_loader::{MovieId, SimilarityStore};
use tmdb_client::{CacheStats, CachedFetcher, MetadataFetcher, MovieDetails};
use tracing::{debug, info};

use crate::page::{Notice, Recommendation, RecommendationPage, SelectedMovie};

/// How many recommendations a request returns at most
pub const RECOMMENDATION_COUNT: usize = 8;

/// Looks up similar movies and decorates them with metadata.
pub struct Recommender<F> {
    store: Arc<SimilarityStore>,
    fetcher: CachedFetcher<F>,
    limit: usize,
}

impl<F: MetadataFetcher> Recommender<F> {
    /// Create a recommender over a loaded store.
    ///
    /// `cache_capacity` bounds the metadata cache; sizing it to
    /// `store.len()` means every movie is fetched at most once.
    pub fn new(store: Arc<SimilarityStore>, fetcher: F, cache_capacity: usize) -> Self {
        Self {
            store,
            fetcher: CachedFetcher::new(fetcher, cache_capacity),
            limit: RECOMMENDATION_COUNT,
        }
    }

    /// Override the number of recommendations (default: 8)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.fetcher.cache().stats()
    }

    /// Recommend movies similar to `title`.
    ///
    /// An unknown title pushes `Notice::TitleNotFound` and returns an empty
    /// list. Movies whose metadata can't be fetched are left out; a fresh
    /// failure also pushes `Notice::FetchFailed`.
    pub async fn recommend(&self, title: &str, notices: &mut Vec<Notice>) -> Vec<Recommendation> {
        match self.store.find_title(title) {
            Some(index) => self.recommend_index(index, notices).await,
            None => {
                info!("Title not found: {:?}", title);
                notices.push(Notice::TitleNotFound {
                    title: title.to_string(),
                });
                Vec::new()
            }
        }
    }

    /// Build the full page for a selection: the selected movie's own
    /// details followed by its recommendations.
    pub async fn build_page(&self, title: &str) -> RecommendationPage {
        let start_time = Instant::now();
        let mut notices = Vec::new();

        let Some(index) = self.store.find_title(title) else {
            let recommendations = self.recommend(title, &mut notices).await;
            return RecommendationPage {
                query: title.to_string(),
                selected: None,
                recommendations,
                notices,
            };
        };

        let selected = match self.store.record(index) {
            Some(record) => Some(SelectedMovie {
                movie_id: record.movie_id,
                title: record.title.clone(),
                details: self.details_for(record.movie_id, &mut notices).await,
            }),
            None => None,
        };

        let recommendations = self.recommend_index(index, &mut notices).await;

        info!(
            "Built page for {:?}: {} recommendations, {} notices in {:.2?}",
            title,
            recommendations.len(),
            notices.len(),
            start_time.elapsed()
        );

        RecommendationPage {
            query: title.to_string(),
            selected,
            recommendations,
            notices,
        }
    }

    async fn recommend_index(&self, index: usize, notices: &mut Vec<Notice>) -> Vec<Recommendation> {
        let ranked = self.store.rank_similar(index, self.limit);
        debug!("Ranked {} neighbours for row {}", ranked.len(), index);

        let mut recommendations = Vec::with_capacity(ranked.len());
        for (row, score) in ranked {
            let Some(record) = self.store.record(row) else {
                continue;
            };
            if let Some(details) = self.details_for(record.movie_id, notices).await {
                recommendations.push(Recommendation {
                    movie_id: record.movie_id,
                    title: record.title.clone(),
                    score,
                    details,
                });
            }
        }

        recommendations
    }

    async fn details_for(&self, movie_id: MovieId, notices: &mut Vec<Notice>) -> Option<MovieDetails> {
        match self.fetcher.fetch_details(movie_id).await {
            Ok(details) => details,
            Err(e) => {
                notices.push(Notice::FetchFailed {
                    movie_id,
                    reason: e.to_string(),
                });
                None
            }
        }
    }
}
