//! Runtime configuration.

use crate::error::{Result, TrainerError};
use std::path::PathBuf;
use vocab_core::algorithm::{get_algorithm, SpacedRepetitionAlgorithm};

pub const DEFAULT_USER: &str = "local";
pub const DEFAULT_ALGORITHM: &str = "sm2";

/// Resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerConfig {
    pub database_path: PathBuf,
    pub user_id: String,
    /// Whether progress is loaded from and written to the store.
    pub persistence: bool,
    pub algorithm: String,
}

impl TrainerConfig {
    pub fn new(
        database_path: Option<PathBuf>,
        user_id: &str,
        local_only: bool,
        algorithm: &str,
    ) -> Result<Self> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(TrainerError::Config("user id must not be empty".into()));
        }
        if get_algorithm(algorithm).is_none() {
            return Err(TrainerError::Config(format!("unknown algorithm: {algorithm}")));
        }

        Ok(Self {
            database_path: database_path.unwrap_or_else(default_db_path),
            user_id: user_id.to_string(),
            persistence: !local_only,
            algorithm: algorithm.to_string(),
        })
    }

    pub fn algorithm(&self) -> Result<Box<dyn SpacedRepetitionAlgorithm>> {
        get_algorithm(&self.algorithm)
            .ok_or_else(|| TrainerError::Config(format!("unknown algorithm: {}", self.algorithm)))
    }

    /// Create the directory holding the database if needed.
    pub fn ensure_data_dir(&self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Database location under the platform data directory, falling back to the
/// current directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-trainer")
        .join("vocab.db")
}
