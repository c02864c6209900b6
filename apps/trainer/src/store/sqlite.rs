//! SQLite implementation of the catalog and progress stores.

use super::{CatalogProvider, ProgressStore, Result, StoreError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use vocab_core::parser::RawWord;
use vocab_core::types::{MasteryLevel, MemoryState, VocabularyItem};

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(super::schema::SCHEMA)?;
        Ok(())
    }

    /// Insert parsed words, returning the IDs of the inserted ones in input
    /// order. Words whose (target, source, part) is already in the catalog are
    /// skipped, so re-importing a list keeps existing IDs and progress.
    pub fn import_words(&self, words: &[RawWord]) -> Result<Vec<i64>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(words.len());
        {
            let mut insert = tx.prepare(
                "INSERT INTO words (target, source, kind, example, part)
                 SELECT ?1, ?2, ?3, ?4, ?5
                 WHERE NOT EXISTS (
                     SELECT 1 FROM words WHERE target = ?1 AND source = ?2 AND part = ?5
                 )",
            )?;
            for word in words {
                let inserted =
                    insert.execute(params![word.target, word.source, word.kind, word.example, word.part])?;
                if inserted > 0 {
                    ids.push(tx.last_insert_rowid());
                }
            }
        }
        tx.commit()?;
        Ok(ids)
    }

    /// Remove every word and all progress. IDs are reassigned on the next import.
    pub fn clear_words(&self) -> Result<()> {
        self.conn.execute_batch(
            "DELETE FROM user_progress;
             DELETE FROM words;",
        )?;
        Ok(())
    }

    pub fn word_count(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))
            .map_err(Into::into)
    }

    fn row_to_state(row: &rusqlite::Row) -> rusqlite::Result<(i64, u32, u32, f64, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
    }
}

impl CatalogProvider for SqliteStore {
    fn load_catalog(&self) -> Result<Vec<VocabularyItem>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, part, source, target, kind, example FROM words ORDER BY id")?;

        let words = stmt
            .query_map([], |row| {
                Ok(VocabularyItem {
                    id: row.get(0)?,
                    part: row.get(1)?,
                    source: row.get(2)?,
                    target: row.get(3)?,
                    kind: row.get(4)?,
                    example: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(words)
    }
}

impl ProgressStore for SqliteStore {
    fn load_progress(&self, user_id: &str) -> Result<HashMap<i64, MemoryState>> {
        let mut stmt = self.conn.prepare(
            "SELECT word_id, repetition, interval_days, easiness_factor, next_review
             FROM user_progress WHERE user_id = ?1",
        )?;

        let rows = stmt
            .query_map(params![user_id], Self::row_to_state)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(word_id, repetition, interval_days, easiness_factor, next_review)| {
                let next_review = DateTime::parse_from_rfc3339(&next_review)
                    .map_err(|e| {
                        StoreError::InvalidData(format!("next_review for word {word_id}: {e}"))
                    })?
                    .with_timezone(&Utc);
                Ok((
                    word_id,
                    MemoryState {
                        repetition,
                        interval_days,
                        easiness_factor,
                        next_review,
                    },
                ))
            })
            .collect()
    }

    fn save_progress(&self, user_id: &str, item_id: i64, state: &MemoryState) -> Result<()> {
        let level = MasteryLevel::for_state(state).index() as i64;
        self.conn.execute(
            "INSERT INTO user_progress (user_id, word_id, repetition, interval_days, easiness_factor, next_review, level)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(user_id, word_id) DO UPDATE SET
                repetition = excluded.repetition,
                interval_days = excluded.interval_days,
                easiness_factor = excluded.easiness_factor,
                next_review = excluded.next_review,
                level = excluded.level",
            params![
                user_id,
                item_id,
                state.repetition,
                state.interval_days,
                state.easiness_factor,
                state.next_review.to_rfc3339(),
                level,
            ],
        )?;
        Ok(())
    }
}
