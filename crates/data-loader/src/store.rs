//! Loading and querying the SimilarityStore.
//!
//! Loading reads the movie list and the three similarity blocks, stacks the
//! blocks in fixed order and checks that the matrix lines up with the list.
//! Queries are plain index lookups plus one stable sort.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, info};

/// File name of the movie list inside the data directory
pub const MOVIE_LIST_FILE: &str = "movielist.dat";

/// File names of the row blocks, in stacking order
pub const SIMILARITY_BLOCK_FILES: [&str; 3] =
    ["cosine_sim1.dat", "cosine_sim2.dat", "cosine_sim3.dat"];

impl SimilarityStore {
    /// Load the movie list and similarity blocks from a directory
    ///
    /// Steps:
    /// 1. Parse the movie list and all three blocks in parallel
    /// 2. Stack the blocks in order 1, 2, 3
    /// 3. Validate that the matrix is square and matches the list
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading similarity data from {:?}", data_dir);

        let movies_path = data_dir.join(MOVIE_LIST_FILE);
        let [block1_path, block2_path, block3_path] =
            SIMILARITY_BLOCK_FILES.map(|name| data_dir.join(name));

        // Nested joins give four-way parallelism over the input files
        let ((records, block1), (block2, block3)) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_movie_list(&movies_path),
                    || parser::parse_matrix_block(&block1_path),
                )
            },
            || {
                rayon::join(
                    || parser::parse_matrix_block(&block2_path),
                    || parser::parse_matrix_block(&block3_path),
                )
            },
        );

        let records = records?;
        let blocks = vec![block1?, block2?, block3?];

        debug!(
            "Parsed {} records and blocks of {} / {} / {} rows",
            records.len(),
            blocks[0].rows(),
            blocks[1].rows(),
            blocks[2].rows()
        );

        let matrix = SimilarityMatrix::stack(blocks)?;
        let store = SimilarityStore::new(records, matrix)?;

        info!(
            "Loaded {} movies with a {}x{} similarity matrix",
            store.len(),
            store.dimension(),
            store.dimension()
        );

        Ok(store)
    }

    /// Row index of the first record whose title matches exactly.
    ///
    /// Duplicate titles resolve to their first occurrence in the list.
    pub fn find_title(&self, title: &str) -> Option<usize> {
        self.records.iter().position(|r| r.title == title)
    }

    /// Rank every other movie by similarity to the one at `index`.
    ///
    /// Returns `(row index, score)` pairs in non-increasing score order,
    /// ties kept in list order, with `index` itself left out and the result
    /// cut to `limit`. An out-of-range index yields an empty list.
    pub fn rank_similar(&self, index: usize, limit: usize) -> Vec<(usize, Score)> {
        let Some(row) = self.matrix.row(index) else {
            return Vec::new();
        };

        let mut ranked: Vec<(usize, Score)> = row.iter().copied().enumerate().collect();

        // sort_by is stable, so equal scores stay in list order
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        ranked
            .into_iter()
            .filter(|&(i, _)| i != index)
            .take(limit)
            .collect()
    }

    /// Case-insensitive substring search over titles, in list order.
    ///
    /// An empty query matches every title.
    pub fn search_titles(&self, query: &str) -> Vec<&MovieRecord> {
        let query = query.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| query.is_empty() || r.title.to_lowercase().contains(&query))
            .collect()
    }
}
