//! Mastery levels and per-level statistics.
//!
//! Levels are used for filtering and reporting only; the memory model never
//! reads them back.

use crate::types::{Filters, MasteryLevel, MemoryState, ReviewableItem};
use serde::{Deserialize, Serialize};

impl MasteryLevel {
    /// Map an interval in days to a level: 0 -> New, 1-6 -> Learning,
    /// 7-21 -> Familiar, above 21 -> Mastered.
    pub fn from_interval(interval_days: u32) -> Self {
        match interval_days {
            0 => Self::New,
            1..=6 => Self::Learning,
            7..=21 => Self::Familiar,
            _ => Self::Mastered,
        }
    }

    /// Level of an item in the given state.
    ///
    /// An item with no current streak (never reviewed or last answer failed)
    /// is New even though a failed item carries a one day interval.
    pub fn for_state(state: &MemoryState) -> Self {
        if state.repetition == 0 {
            Self::New
        } else {
            Self::from_interval(state.interval_days)
        }
    }
}

/// Item counts per mastery level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelStats {
    pub counts: [usize; 4],
}

impl LevelStats {
    /// Count items whose part passes the active part filter. The level filter
    /// is ignored so that every bucket stays visible.
    pub fn collect<'a>(items: impl IntoIterator<Item = &'a ReviewableItem>, filters: &Filters) -> Self {
        let mut stats = Self::default();
        for item in items {
            if filters.allows_part(item.item.part) {
                stats.counts[item.level.index()] += 1;
            }
        }
        stats
    }

    pub fn count(&self, level: MasteryLevel) -> usize {
        self.counts[level.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn mastered(&self) -> usize {
        self.count(MasteryLevel::Mastered)
    }

    pub fn learning(&self) -> usize {
        self.count(MasteryLevel::Learning) + self.count(MasteryLevel::Familiar)
    }

    /// Level-weighted progress, 0-100.
    pub fn progress_percentage(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        let score: usize = MasteryLevel::ALL
            .iter()
            .map(|level| level.index() * self.count(*level))
            .sum();
        ((score as f64 / (total * 3) as f64) * 100.0).round() as u32
    }
}
