//! Async driver around the session controller.
//!
//! Owns the store, performs the catalog/progress load on the blocking pool and
//! dispatches persistence requests without waiting for them.

use crate::session::{PersistRequest, Review, SessionController};
use crate::store::{CatalogProvider, ProgressStore, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use vocab_core::types::{MemoryState, VocabularyItem};

/// Study session bound to a store and a user.
pub struct Trainer<S> {
    session: SessionController,
    store: Arc<Mutex<S>>,
    user_id: String,
    pending: Vec<JoinHandle<()>>,
}

impl<S> Trainer<S>
where
    S: CatalogProvider + ProgressStore + Send + 'static,
{
    /// Progress is loaded and saved only if the session has persistence on.
    pub fn new(session: SessionController, store: Arc<Mutex<S>>, user_id: impl Into<String>) -> Self {
        Self {
            session,
            store,
            user_id: user_id.into(),
            pending: Vec::new(),
        }
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionController {
        &mut self.session
    }

    /// Load the catalog and the user's progress, then present the first item.
    ///
    /// Load failures are logged and recovered with empty data.
    pub async fn load(&mut self) -> bool {
        let ticket = self.session.begin_load();
        let (catalog, progress) = tokio::join!(self.fetch_catalog(), self.fetch_progress());
        self.session.finish_load(ticket, catalog, progress)
    }

    /// Submit a typed answer and persist the result in the background.
    pub fn submit_answer(&mut self, input: &str) -> Option<Review> {
        let review = self.session.submit_answer(input)?;
        self.dispatch(&review);
        Some(review)
    }

    pub fn give_up(&mut self) -> Option<Review> {
        let review = self.session.give_up()?;
        self.dispatch(&review);
        Some(review)
    }

    pub fn skip(&mut self) -> Option<Review> {
        let review = self.session.skip()?;
        self.dispatch(&review);
        Some(review)
    }

    /// Wait for every outstanding write.
    pub async fn flush(&mut self) {
        for handle in self.pending.drain(..) {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "progress write task panicked");
            }
        }
    }

    fn dispatch(&mut self, review: &Review) {
        if let Some(request) = &review.persist {
            self.pending.retain(|handle| !handle.is_finished());
            let handle = self.persist(request.clone());
            self.pending.push(handle);
        }
    }

    fn persist(&self, request: PersistRequest) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let user_id = self.user_id.clone();
        tokio::task::spawn_blocking(move || {
            let result = lock(&store)
                .and_then(|guard| guard.save_progress(&user_id, request.item_id, &request.state));
            match result {
                Ok(()) => tracing::debug!(user_id = %user_id, item_id = request.item_id, "progress saved"),
                Err(e) => tracing::error!(
                    user_id = %user_id,
                    item_id = request.item_id,
                    error = %e,
                    "failed to save progress; local state is ahead of the store"
                ),
            }
        })
    }

    async fn fetch_catalog(&self) -> Vec<VocabularyItem> {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || {
            let guard = lock(&store)?;
            guard.load_catalog()
        })
        .await;
        match result {
            Ok(Ok(catalog)) => {
                tracing::info!(words = catalog.len(), "catalog loaded");
                catalog
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "failed to load catalog");
                Vec::new()
            }
            Err(e) => {
                tracing::error!(error = %e, "catalog load task panicked");
                Vec::new()
            }
        }
    }

    async fn fetch_progress(&self) -> HashMap<i64, MemoryState> {
        if !self.session.persistence() {
            return HashMap::new();
        }
        let store = Arc::clone(&self.store);
        let user_id = self.user_id.clone();
        let result = tokio::task::spawn_blocking(move || {
            let guard = lock(&store)?;
            guard.load_progress(&user_id)
        })
        .await;
        match result {
            Ok(Ok(progress)) => {
                tracing::info!(user_id = %self.user_id, reviewed = progress.len(), "progress loaded");
                progress
            }
            Ok(Err(e)) => {
                tracing::error!(user_id = %self.user_id, error = %e, "failed to load progress");
                HashMap::new()
            }
            Err(e) => {
                tracing::error!(user_id = %self.user_id, error = %e, "progress load task panicked");
                HashMap::new()
            }
        }
    }
}

fn lock<S>(store: &Arc<Mutex<S>>) -> Result<std::sync::MutexGuard<'_, S>, StoreError> {
    store
        .lock()
        .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
}
