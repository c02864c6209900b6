//! Spaced-repetition core for the vocabulary trainer.
//!
//! Provides:
//! - Answer matching with synonym support and edit-distance tolerance
//! - SM-2 memory model behind the `SpacedRepetitionAlgorithm` trait
//! - Mastery level mapping and per-level statistics
//! - Due-aware deck selection with a bounded random pool
//! - Word-list parser for catalog imports
//! - Shared types (VocabularyItem, MemoryState, ReviewableItem, Filters, etc.)

pub mod algorithm;
pub mod error;
pub mod level;
pub mod matching;
pub mod parser;
pub mod selector;
pub mod types;

pub use algorithm::{get_algorithm, SchedulingResult, SpacedRepetitionAlgorithm};
pub use error::{ParseError, Result};
pub use level::LevelStats;
pub use matching::{classify, compare_answer, levenshtein_distance, normalize, MatchResult, Verdict};
pub use parser::{parse, ParsedCatalog, RawWord};
pub use selector::{due_items, select_next, CANDIDATE_POOL_SIZE};
pub use types::{
    AnswerOutcome, FilterToggle, Filters, MasteryLevel, MemoryState, Quality, ReviewableItem, VocabularyItem,
};
