//! Core domain types for the similarity store.
//!
//! - `MovieRecord`: one entry of the precomputed movie list
//! - `MatrixBlock`: one row-partitioned slice of the similarity matrix
//! - `SimilarityMatrix`: the stacked, square score matrix
//! - `SimilarityStore`: records and matrix, aligned by row index

use serde::{Deserialize, Serialize};

use crate::error::{DataLoadError, Result};

// =============================================================================
// Type Aliases
// =============================================================================

/// TMDb identifier of a movie, as stored in the movie list
pub type MovieId = u32;

/// Similarity score between two movies
pub type Score = f32;

// =============================================================================
// Records
// =============================================================================

/// A movie from the precomputed movie list.
///
/// The record's position in the list is its row (and column) in the
/// similarity matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub movie_id: MovieId,
    pub title: String,
}

impl MovieRecord {
    pub fn new(movie_id: MovieId, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
        }
    }
}

// =============================================================================
// Matrix Types
// =============================================================================

/// A contiguous run of similarity matrix rows, as read from one block file.
///
/// Scores are stored row-major in a single `Vec` so that stacking blocks is
/// a plain `extend`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBlock {
    cols: usize,
    scores: Vec<Score>,
}

impl MatrixBlock {
    /// Build a block from row-major scores.
    ///
    /// An empty block (no rows) is allowed and has zero columns.
    pub fn from_rows(rows: Vec<Vec<Score>>) -> Result<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut scores = Vec::with_capacity(cols * rows.len());

        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(DataLoadError::ValidationError(format!(
                    "row {} has {} scores, expected {}",
                    idx,
                    row.len(),
                    cols
                )));
            }
            scores.extend(row);
        }

        Ok(Self { cols, scores })
    }

    pub fn rows(&self) -> usize {
        if self.cols == 0 { 0 } else { self.scores.len() / self.cols }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Square matrix of pairwise similarity scores.
///
/// Entry (i, j) is the similarity between record i and record j. Symmetry is
/// expected from the offline process but not checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dimension: usize,
    scores: Vec<Score>,
}

impl SimilarityMatrix {
    /// Stack row blocks on top of each other, in the order given.
    ///
    /// Blocks of a, b and c rows yield a matrix of a + b + c rows. Empty
    /// blocks are skipped; all other blocks must share one column count and
    /// the result must be square.
    pub fn stack(blocks: Vec<MatrixBlock>) -> Result<Self> {
        let mut cols: Option<usize> = None;
        let mut scores = Vec::new();
        let mut rows = 0;

        for (idx, block) in blocks.into_iter().enumerate() {
            if block.is_empty() {
                continue;
            }
            match cols {
                None => cols = Some(block.cols()),
                Some(expected) if expected != block.cols() => {
                    return Err(DataLoadError::ValidationError(format!(
                        "block {} has {} columns, expected {}",
                        idx + 1,
                        block.cols(),
                        expected
                    )));
                }
                Some(_) => {}
            }
            rows += block.rows();
            scores.extend(block.scores);
        }

        let cols = cols.unwrap_or(0);
        if rows != cols {
            return Err(DataLoadError::ValidationError(format!(
                "similarity matrix is not square: {} rows x {} columns",
                rows, cols
            )));
        }

        Ok(Self {
            dimension: rows,
            scores,
        })
    }

    /// Number of rows (and columns)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Scores of one row, or `None` if out of range
    pub fn row(&self, index: usize) -> Option<&[Score]> {
        if index >= self.dimension {
            return None;
        }
        let start = index * self.dimension;
        Some(&self.scores[start..start + self.dimension])
    }
}

// =============================================================================
// Store
// =============================================================================

/// The movie list together with its similarity matrix.
///
/// Built once at startup and read-only afterwards, so it can be shared
/// behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct SimilarityStore {
    pub(crate) records: Vec<MovieRecord>,
    pub(crate) matrix: SimilarityMatrix,
}

impl SimilarityStore {
    /// Pair records with a matrix, checking that they line up row for row.
    pub fn new(records: Vec<MovieRecord>, matrix: SimilarityMatrix) -> Result<Self> {
        if records.is_empty() {
            return Err(DataLoadError::ValidationError(
                "movie list is empty".to_string(),
            ));
        }
        if records.len() != matrix.dimension() {
            return Err(DataLoadError::ValidationError(format!(
                "movie list has {} records but similarity matrix has {} rows",
                records.len(),
                matrix.dimension()
            )));
        }
        Ok(Self { records, matrix })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Dimension of the underlying matrix (always equal to `len()`)
    pub fn dimension(&self) -> usize {
        self.matrix.dimension()
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&MovieRecord> {
        self.records.get(index)
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }
}
