//! Error types for xref-core.
//!
//! Graph operations themselves cannot fail. Everything here belongs to the
//! row source: reading delimited text and turning records into rows.

use thiserror::Error;

use crate::ingest::RowKind;

/// Result type alias for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// A record did not have exactly the number of fields its row shape needs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} row has {found} fields, expected {expected}")]
pub struct RowShapeError {
    pub kind: RowKind,
    pub expected: usize,
    pub found: usize,
}

/// The requested field separator cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid field delimiter {0:?}: must not be a quote or line break")]
pub struct DelimiterError(pub char);

/// Errors raised while splitting delimited text into records.
#[derive(Error, Debug)]
pub enum ReadError {
    /// A quote appeared inside an unquoted field.
    #[error("line {line}, column {column}: bare \" in non-quoted field")]
    BareQuote { line: usize, column: usize },

    /// Something other than a separator followed a closing quote.
    #[error("line {line}, column {column}: extraneous or missing \" in quoted field")]
    ExtraneousQuote { line: usize, column: usize },

    /// Input ended inside a quoted field.
    #[error("line {line}: quoted field is never closed")]
    UnterminatedQuote { line: usize },

    /// Underlying reader failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReadError {
    /// Line the error was detected on, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ReadError::BareQuote { line, .. }
            | ReadError::ExtraneousQuote { line, .. }
            | ReadError::UnterminatedQuote { line } => Some(*line),
            ReadError::Io(_) => None,
        }
    }
}

/// Errors surfaced by the load drivers under a failing policy.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A record could not be read or had the wrong shape.
    #[error("malformed {kind} record at line {line}: {reason}")]
    Malformed {
        kind: RowKind,
        line: usize,
        reason: String,
    },

    /// The source could not be read.
    #[error("IO error while reading {kind} source: {source}")]
    Io {
        kind: RowKind,
        #[source]
        source: std::io::Error,
    },
}
