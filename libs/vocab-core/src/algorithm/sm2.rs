//! SM-2 spaced repetition algorithm.
//!
//! Classic SuperMemo 2: a successful recall (quality >= 3) grows the interval
//! 1 -> 6 -> interval * easiness, a failed one forgets all progress on the item.
//! The easiness factor moves on every review and never drops below its floor.

use super::{SchedulingResult, SpacedRepetitionAlgorithm};
use crate::types::{MemoryState, Quality};
use chrono::{DateTime, Duration, Utc};

/// Longest interval ever scheduled, in days (about 100 years).
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub first_interval: u32,
    pub second_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            first_interval: 1,
            second_interval: 6,
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self, now: DateTime<Utc>) -> MemoryState {
        MemoryState {
            repetition: 0,
            interval_days: 0,
            easiness_factor: self.initial_ease,
            next_review: now,
        }
    }

    fn schedule(&self, state: &MemoryState, quality: Quality, now: DateTime<Utc>) -> SchedulingResult {
        let (repetition, interval_days) = if quality.is_success() {
            let interval = match state.repetition {
                0 => self.first_interval,
                1 => self.second_interval,
                _ => {
                    let grown = (f64::from(state.interval_days) * state.easiness_factor).round();
                    grown.min(f64::from(MAX_INTERVAL_DAYS)) as u32
                }
            };
            (state.repetition.saturating_add(1), interval.min(MAX_INTERVAL_DAYS))
        } else {
            (0, self.first_interval)
        };

        let easiness_factor = self.next_ease(state.easiness_factor, quality);
        let next_due = now
            .checked_add_signed(Duration::days(i64::from(interval_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        SchedulingResult {
            new_state: MemoryState {
                repetition,
                interval_days,
                easiness_factor,
                next_review: next_due,
            },
            next_due,
        }
    }
}

impl Sm2 {
    fn next_ease(&self, ease: f64, quality: Quality) -> f64 {
        let miss = f64::from(5 - quality.value());
        let updated = ease + (0.1 - miss * (0.08 + miss * 0.02));
        updated.max(self.minimum_ease)
    }
}
