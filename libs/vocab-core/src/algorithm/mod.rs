//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::types::{MemoryState, Quality};
use chrono::{DateTime, Utc};

/// Result of scheduling an item after a review.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingResult {
    pub new_state: MemoryState,
    pub next_due: DateTime<Utc>,
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next memory state after a review at `now`.
    fn schedule(&self, state: &MemoryState, quality: Quality, now: DateTime<Utc>) -> SchedulingResult;

    /// Initial state for a never reviewed item.
    fn initial_state(&self, now: DateTime<Utc>) -> MemoryState;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "sm2" => Some(Box::new(sm2::Sm2::default())),
        _ => None,
    }
}
