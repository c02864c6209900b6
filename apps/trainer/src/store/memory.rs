//! In-memory store, used for tests and as a scratch backend.

use super::{CatalogProvider, ProgressStore, Result, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use vocab_core::types::{MemoryState, VocabularyItem};

/// Store holding everything in process memory.
#[derive(Default)]
pub struct MemoryStore {
    catalog: Vec<VocabularyItem>,
    progress: Mutex<HashMap<(String, i64), MemoryState>>,
    fail_catalog_loads: AtomicBool,
    fail_progress_loads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new(catalog: Vec<VocabularyItem>) -> Self {
        Self {
            catalog,
            ..Default::default()
        }
    }

    /// Make every subsequent catalog and progress load fail.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_catalog_loads(fail);
        self.fail_progress_loads(fail);
    }

    pub fn fail_catalog_loads(&self, fail: bool) {
        self.fail_catalog_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_progress_loads(&self, fail: bool) {
        self.fail_progress_loads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stored state for one user and item.
    pub fn get(&self, user_id: &str, item_id: i64) -> Option<MemoryState> {
        self.progress
            .lock()
            .ok()?
            .get(&(user_id.to_string(), item_id))
            .cloned()
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("{what} rejected")));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<(String, i64), MemoryState>>> {
        self.progress
            .lock()
            .map_err(|_| StoreError::Unavailable("progress lock poisoned".into()))
    }
}

impl CatalogProvider for MemoryStore {
    fn load_catalog(&self) -> Result<Vec<VocabularyItem>> {
        Self::check(&self.fail_catalog_loads, "catalog load")?;
        Ok(self.catalog.clone())
    }
}

impl ProgressStore for MemoryStore {
    fn load_progress(&self, user_id: &str) -> Result<HashMap<i64, MemoryState>> {
        Self::check(&self.fail_progress_loads, "progress load")?;
        Ok(self
            .lock()?
            .iter()
            .filter(|((user, _), _)| user == user_id)
            .map(|((_, item_id), state)| (*item_id, state.clone()))
            .collect())
    }

    fn save_progress(&self, user_id: &str, item_id: i64, state: &MemoryState) -> Result<()> {
        Self::check(&self.fail_writes, "write")?;
        self.lock()?
            .insert((user_id.to_string(), item_id), state.clone());
        Ok(())
    }
}
