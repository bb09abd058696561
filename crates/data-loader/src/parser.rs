//! Parsers for the precomputed data files.
//!
//! - movielist.dat: movieId::title
//! - cosine_sim{1,2,3}.dat: one matrix row per line, scores separated by
//!   commas and/or whitespace
//!
//! Each parser has a `_str` twin that works on already-read content, which
//! is what the file-based versions call after reading.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a whole file as UTF-8.
///
/// Invalid UTF-8 is reported as a parse error on the line where the bad
/// bytes start.
fn read_utf8(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;

    String::from_utf8(bytes).map_err(|e| {
        let valid_up_to = e.utf8_error().valid_up_to();
        let line = e.as_bytes()[..valid_up_to]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1;
        DataLoadError::ParseError {
            file: file_label(path),
            line,
            reason: "Invalid UTF-8".to_string(),
        }
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the movie list file
///
/// Format: movieId::title
///
/// Only the first `::` separates the fields, so a title such as
/// "Mission: Impossible" or even one containing `::` survives intact.
pub fn parse_movie_list(path: &Path) -> Result<Vec<MovieRecord>> {
    let content = read_utf8(path)?;
    parse_movie_list_str(&content, &file_label(path))
}

pub fn parse_movie_list_str(content: &str, file: &str) -> Result<Vec<MovieRecord>> {
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let (movie_id, title) =
            line_trimmed
                .split_once("::")
                .ok_or_else(|| DataLoadError::ParseError {
                    file: file.to_string(),
                    line: line_no,
                    reason: "Missing '::' separator".to_string(),
                })?;

        let title = title.trim();
        if title.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Missing title".to_string(),
            });
        }

        let record = MovieRecord {
            movie_id: movie_id
                .trim()
                .parse()
                .map_err(|e| DataLoadError::ParseError {
                    file: file.to_string(),
                    line: line_no,
                    reason: format!("Invalid movieId: {}", e),
                })?,
            title: title.to_string(),
        };

        records.push(record);
    }

    Ok(records)
}

/// Parse one similarity block file
///
/// Every non-blank line is a matrix row. All rows in a block must have the
/// same number of scores, and every score must be finite.
pub fn parse_matrix_block(path: &Path) -> Result<MatrixBlock> {
    let content = read_utf8(path)?;
    parse_matrix_block_str(&content, &file_label(path))
}

pub fn parse_matrix_block_str(content: &str, file: &str) -> Result<MatrixBlock> {
    let mut rows: Vec<Vec<Score>> = Vec::new();
    let mut expected: Option<usize> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let row = parse_row(line_trimmed, file, line_no)?;

        match expected {
            None => expected = Some(row.len()),
            Some(n) if n != row.len() => {
                return Err(DataLoadError::FieldCountMismatch {
                    file: file.to_string(),
                    expected: n,
                    found: row.len(),
                    line: line_no,
                });
            }
            Some(_) => {}
        }

        rows.push(row);
    }

    MatrixBlock::from_rows(rows)
}

/// Split a row on commas, then on whitespace within each field.
///
/// A comma-separated field must hold at least one score, so `1.0,,0.2` is
/// a missing value rather than a two-column row.
fn parse_row(line: &str, file: &str, line_no: usize) -> Result<Vec<Score>> {
    let mut scores = Vec::new();

    for field in line.split(',') {
        let field = field.trim();
        if field.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Empty score field".to_string(),
            });
        }

        for token in field.split_whitespace() {
            let score: Score = token.parse().map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid score '{}': {}", token, e),
            })?;
            if !score.is_finite() {
                return Err(DataLoadError::InvalidValue {
                    field: format!("score at line {} of {}", line_no, file),
                    value: token.to_string(),
                });
            }
            scores.push(score);
        }
    }

    Ok(scores)
}
