//! Catalog and progress storage.

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::collections::HashMap;
use vocab_core::types::{MemoryState, VocabularyItem};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Source of the word catalog.
pub trait CatalogProvider {
    /// All catalog entries, ordered by ID.
    fn load_catalog(&self) -> Result<Vec<VocabularyItem>>;
}

/// Per-user memory state, keyed by (user, item).
pub trait ProgressStore {
    /// Stored state of every item the user has reviewed. Missing items were
    /// never reviewed.
    fn load_progress(&self, user_id: &str) -> Result<HashMap<i64, MemoryState>>;

    /// Insert or replace the state of one item.
    fn save_progress(&self, user_id: &str, item_id: i64, state: &MemoryState) -> Result<()>;
}
