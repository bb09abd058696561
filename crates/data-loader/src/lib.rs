//! # Data Loader Crate
//!
//! Loads the precomputed movie list and similarity matrix that the
//! recommender looks movies up in.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, MatrixBlock, SimilarityMatrix, SimilarityStore)
//! - **parser**: Parse the movie list and similarity block files
//! - **store**: Load the store from a directory and query it
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::SimilarityStore;
//! use std::path::Path;
//!
//! let store = SimilarityStore::load_from_files(Path::new("data"))?;
//!
//! let index = store.find_title("Avatar").unwrap();
//! for (row, score) in store.rank_similar(index, 8) {
//!     println!("{} ({:.3})", store.record(row).unwrap().title, score);
//! }
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod store;

pub use error::{DataLoadError, Result};
pub use store::{MOVIE_LIST_FILE, SIMILARITY_BLOCK_FILES};
pub use types::{
    // Type aliases
    MovieId,
    Score,
    // Core types
    MovieRecord,
    MatrixBlock,
    SimilarityMatrix,
    SimilarityStore,
};
