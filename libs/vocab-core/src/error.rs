//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing a word list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed row at line {line}: expected 4 '|'-separated fields, found {fields}")]
    MalformedRow { line: usize, fields: usize },

    #[error("missing {field} at line {line}")]
    MissingField { line: usize, field: &'static str },
}
