//! Shared setup for trainer integration tests.

pub mod fixtures;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use vocab_core::algorithm::get_algorithm;
use vocab_core::parser;
use vocab_core::types::Filters;
use vocab_trainer::{SessionController, SqliteStore, Trainer};

/// On-disk database in a temporary directory, seeded with the fixture word list.
pub struct TestContext {
    _dir: TempDir,
    pub db_path: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("vocab.db");

        let store = SqliteStore::open(&db_path).expect("Failed to open store");
        let parsed = parser::parse(fixtures::WORD_LIST).expect("Fixture must parse");
        store
            .import_words(&parsed.words)
            .expect("Failed to import fixture words");

        Self { _dir: dir, db_path }
    }

    pub fn store(&self) -> Arc<Mutex<SqliteStore>> {
        let store = SqliteStore::open(&self.db_path).expect("Failed to open store");
        Arc::new(Mutex::new(store))
    }

    /// Trainer over a fresh connection, not yet loaded.
    pub fn trainer(&self, user_id: &str, filters: Filters, persistence: bool) -> Trainer<SqliteStore> {
        let session = SessionController::new(
            get_algorithm("sm2").expect("sm2 is registered"),
            filters,
            persistence,
        )
        .with_seed(42);
        Trainer::new(session, self.store(), user_id)
    }
}
