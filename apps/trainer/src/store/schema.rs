//! SQLite schema definitions.

/// Schema for the catalog and per-user progress.
pub const SCHEMA: &str = r#"
-- Word catalog
CREATE TABLE IF NOT EXISTS words (
    id INTEGER PRIMARY KEY,
    target TEXT NOT NULL,
    source TEXT NOT NULL,
    kind TEXT,
    example TEXT NOT NULL DEFAULT '',
    part INTEGER NOT NULL DEFAULT 1
);

-- Memory state per user and word
CREATE TABLE IF NOT EXISTS user_progress (
    user_id TEXT NOT NULL,
    word_id INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
    repetition INTEGER NOT NULL DEFAULT 0,
    interval_days INTEGER NOT NULL DEFAULT 0,
    easiness_factor REAL NOT NULL DEFAULT 2.5,
    next_review TEXT NOT NULL,
    level INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, word_id)
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_words_part ON words(part);
CREATE INDEX IF NOT EXISTS idx_user_progress_due ON user_progress(user_id, next_review);
"#;
