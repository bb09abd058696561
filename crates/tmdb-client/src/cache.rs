//! Bounded memoization of metadata lookups.
//!
//! `DetailsCache` is a least-recently-used map from movie id to the outcome
//! of its last fetch. `CachedFetcher` puts it in front of any
//! `MetadataFetcher` so that each id is fetched at most once while it stays
//! in the cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use data_loader::MovieId;
use linked_hash_map::LinkedHashMap;
use tracing::{debug, warn};

use crate::{MetadataFetcher, MovieDetails, TmdbError};

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

/// LRU cache of fetch outcomes keyed by movie id.
///
/// A `None` value records a failed fetch; it is served like any other hit
/// so a failing id is not requested again while it remains cached.
pub struct DetailsCache {
    entries: Mutex<LinkedHashMap<MovieId, Option<MovieDetails>>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DetailsCache {
    /// Create a cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(LinkedHashMap::new()),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    // The map holds plain data, so a panic elsewhere can't leave it torn
    fn lock(&self) -> MutexGuard<'_, LinkedHashMap<MovieId, Option<MovieDetails>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up an id, marking it most recently used.
    ///
    /// The outer `Option` is hit/miss; the inner one is the cached outcome.
    pub fn get(&self, movie_id: MovieId) -> Option<Option<MovieDetails>> {
        let mut entries = self.lock();
        match entries.get_refresh(&movie_id) {
            Some(outcome) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(outcome.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store an outcome, evicting the least recently used entry when full
    pub fn insert(&self, movie_id: MovieId, outcome: Option<MovieDetails>) {
        let mut entries = self.lock();
        if entries.contains_key(&movie_id) {
            entries.insert(movie_id, outcome);
            return;
        }
        while entries.len() >= self.capacity {
            if let Some((evicted, _)) = entries.pop_front() {
                debug!(movie_id = evicted, "Evicted movie details from cache");
            } else {
                break;
            }
        }
        entries.insert(movie_id, outcome);
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
            capacity: self.capacity,
        }
    }
}

/// A `MetadataFetcher` wrapped with a `DetailsCache`.
pub struct CachedFetcher<F> {
    inner: F,
    cache: DetailsCache,
}

impl<F: MetadataFetcher> CachedFetcher<F> {
    pub fn new(inner: F, capacity: usize) -> Self {
        Self {
            inner,
            cache: DetailsCache::new(capacity),
        }
    }

    /// Fetch details for a movie, at most once per cached id.
    ///
    /// - `Ok(Some(_))`: details, fresh or cached
    /// - `Ok(None)`: an earlier fetch for this id failed and was remembered
    /// - `Err(_)`: this call hit the API and failed; the failure is now cached
    pub async fn fetch_details(&self, movie_id: MovieId) -> Result<Option<MovieDetails>, TmdbError> {
        if let Some(outcome) = self.cache.get(movie_id) {
            debug!(movie_id, found = outcome.is_some(), "Movie details cache hit");
            return Ok(outcome);
        }

        match self.inner.fetch_details(movie_id).await {
            Ok(details) => {
                self.cache.insert(movie_id, Some(details.clone()));
                Ok(Some(details))
            }
            Err(e) => {
                warn!(movie_id, error = %e, "Failed to fetch movie details");
                self.cache.insert(movie_id, None);
                Err(e)
            }
        }
    }

    pub fn cache(&self) -> &DetailsCache {
        &self.cache
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}
