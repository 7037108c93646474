//! Error types for lake polygon analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Why a coordinate stream could not be turned into rings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    /// The geometry text held no numeric tokens at all.
    #[error("no numeric tokens in geometry field")]
    NoNumbers,

    /// The stream ended with an unpaired coordinate.
    #[error("odd number of coordinates ({len}), trailing value has no pair")]
    OddLength {
        /// Total number of values in the stream.
        len: usize,
    },
}

/// Why a polygon cannot be analyzed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DegenerateReason {
    #[error("only {distinct} distinct vertices, need at least 3")]
    TooFewVertices { distinct: usize },

    #[error("longest edge is {longest} m")]
    ZeroLengthEdges { longest: f64 },
}

/// Errors that can occur while loading, analyzing or validating polygons.
#[derive(Debug, Error)]
pub enum LakeError {
    /// The input path does not exist.
    #[error("source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// The raw coordinate stream could not be paired into rings.
    #[error("malformed coordinate stream{}: {reason}", row_suffix(*row))]
    MalformedStream {
        /// Source row the problem was found on, when known.
        row: Option<usize>,
        reason: MalformedReason,
    },

    /// The polygon cannot be searched without dividing by zero.
    #[error("polygon {id} is degenerate: {reason}")]
    DegeneratePolygon { id: usize, reason: DegenerateReason },

    /// A lookup referenced an ID that is not in the collection.
    #[error("no {kind} with id {id}")]
    LookupMiss { kind: &'static str, id: usize },

    /// Target length must be finite and non-negative.
    #[error("invalid target length: {0} m")]
    InvalidTarget(f64),

    /// Reading or writing a CSV table failed.
    #[error("table error in {}: {source}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The geometry column is missing from a raw export.
    #[error("column {column:?} not found in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn row_suffix(row: Option<usize>) -> String {
    match row {
        Some(r) => format!(" at row {}", r),
        None => String::new(),
    }
}

impl LakeError {
    pub(crate) fn table(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        LakeError::Table {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, LakeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_includes_row() {
        let err = LakeError::MalformedStream {
            row: Some(4),
            reason: MalformedReason::NoNumbers,
        };
        assert_eq!(
            err.to_string(),
            "malformed coordinate stream at row 4: no numeric tokens in geometry field"
        );
    }

    #[test]
    fn test_malformed_message_without_row() {
        let err = LakeError::MalformedStream {
            row: None,
            reason: MalformedReason::OddLength { len: 7 },
        };
        assert!(err.to_string().starts_with("malformed coordinate stream: odd"));
    }

    #[test]
    fn test_degenerate_message() {
        let err = LakeError::DegeneratePolygon {
            id: 3,
            reason: DegenerateReason::TooFewVertices { distinct: 2 },
        };
        assert_eq!(
            err.to_string(),
            "polygon 3 is degenerate: only 2 distinct vertices, need at least 3"
        );
    }
}
