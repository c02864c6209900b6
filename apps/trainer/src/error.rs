//! Error handling for the trainer.

use crate::store::StoreError;
use thiserror::Error;
use vocab_core::error::ParseError;

/// Trainer error types
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for trainer operations
pub type Result<T> = std::result::Result<T, TrainerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let error = TrainerError::Config("unknown algorithm: fsrs".to_string());
        assert_eq!(error.to_string(), "Configuration error: unknown algorithm: fsrs");
    }

    #[test]
    fn test_error_display_parse() {
        let error = TrainerError::from(ParseError::MalformedRow { line: 4, fields: 2 });
        assert_eq!(
            error.to_string(),
            "Parse error: malformed row at line 4: expected 4 '|'-separated fields, found 2"
        );
    }

    #[test]
    fn test_error_display_store() {
        let error = TrainerError::from(StoreError::InvalidData("bad timestamp".to_string()));
        assert_eq!(error.to_string(), "Store error: invalid data: bad timestamp");
    }
}
