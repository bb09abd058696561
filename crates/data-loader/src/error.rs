//! Error types for the data-loader crate.
//!
//! Every failure here is fatal at startup: a missing or malformed movie list
//! or similarity block means there is nothing to recommend from.

use thiserror::Error;

/// Errors that can occur while loading the movie list and similarity blocks
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A score was parsed but is not usable (NaN or infinite)
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A row has a different number of scores than the rows before it
    #[error("Expected {expected} scores but found {found} in line {line} of {file}")]
    FieldCountMismatch {
        file: String,
        expected: usize,
        found: usize,
        line: usize,
    },

    /// Loaded data doesn't line up (non-square matrix, record count mismatch)
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
