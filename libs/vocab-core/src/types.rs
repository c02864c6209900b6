//! Core types for the vocabulary trainer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Coarse mastery bucket derived from the review interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
    New,
    Learning,
    Familiar,
    Mastered,
}

impl MasteryLevel {
    pub const ALL: [MasteryLevel; 4] = [
        MasteryLevel::New,
        MasteryLevel::Learning,
        MasteryLevel::Familiar,
        MasteryLevel::Mastered,
    ];

    /// Numeric level (0-3).
    pub fn index(self) -> usize {
        match self {
            Self::New => 0,
            Self::Learning => 1,
            Self::Familiar => 2,
            Self::Mastered => 3,
        }
    }

    /// Create from numeric level (0-3).
    pub fn from_index(value: usize) -> Option<Self> {
        Self::ALL.get(value).copied()
    }
}

impl Default for MasteryLevel {
    fn default() -> Self {
        Self::New
    }
}

/// How a single turn was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Exact,
    Fuzzy,
    Incorrect,
    Skipped,
    GivenUp,
}

impl AnswerOutcome {
    /// SM-2 quality for this outcome. Giving up counts as an incorrect answer.
    pub fn quality(self) -> Quality {
        match self {
            Self::Skipped => Quality::Blackout,
            Self::Incorrect | Self::GivenUp => Quality::Incorrect,
            Self::Fuzzy => Quality::Hesitant,
            Self::Exact => Quality::Perfect,
        }
    }

    pub fn is_correct(self) -> bool {
        matches!(self, Self::Exact | Self::Fuzzy)
    }
}

/// Recall quality fed to the memory model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Skipped, nothing recalled.
    Blackout,
    Incorrect,
    /// Correct with a typo.
    Hesitant,
    Perfect,
}

impl Quality {
    /// Numeric value on the 0-5 SM-2 scale.
    pub fn value(self) -> u8 {
        match self {
            Self::Blackout => 0,
            Self::Incorrect => 1,
            Self::Hesitant => 3,
            Self::Perfect => 5,
        }
    }

    /// Create from a 0-5 value. Only the four values the trainer emits are accepted.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Blackout),
            1 => Some(Self::Incorrect),
            3 => Some(Self::Hesitant),
            5 => Some(Self::Perfect),
            _ => None,
        }
    }

    pub fn is_success(self) -> bool {
        self.value() >= 3
    }
}

/// Catalog entry. Read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: i64,
    /// Deck number the word belongs to.
    pub part: u32,
    /// Prompt text shown on the front of the card.
    pub source: String,
    /// Accepted answer. May hold several synonyms separated by `/`.
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub example: String,
}

/// Per user and item memory state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    pub repetition: u32,
    pub interval_days: u32,
    pub easiness_factor: f64,
    pub next_review: DateTime<Utc>,
}

impl MemoryState {
    /// State of a never reviewed item, due at `now`.
    pub fn new_at(now: DateTime<Utc>) -> Self {
        Self {
            repetition: 0,
            interval_days: 0,
            easiness_factor: 2.5,
            next_review: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }
}

impl Default for MemoryState {
    fn default() -> Self {
        Self::new_at(Utc::now())
    }
}

/// Catalog entry merged with its memory state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewableItem {
    #[serde(flatten)]
    pub item: VocabularyItem,
    pub memory: MemoryState,
    pub level: MasteryLevel,
}

impl ReviewableItem {
    /// Merge a catalog entry with its stored state, defaulting when absent.
    pub fn merge(item: VocabularyItem, stored: Option<MemoryState>, now: DateTime<Utc>) -> Self {
        let memory = stored.unwrap_or_else(|| MemoryState::new_at(now));
        let level = MasteryLevel::for_state(&memory);
        Self { item, memory, level }
    }

    pub fn id(&self) -> i64 {
        self.item.id
    }

    /// Replace the memory state and recompute the level.
    pub fn apply(&mut self, memory: MemoryState) {
        self.level = MasteryLevel::for_state(&memory);
        self.memory = memory;
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.memory.is_due(now)
    }
}

/// Which filter set a toggle applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "dimension", content = "value")]
pub enum FilterToggle {
    Level(MasteryLevel),
    Part(u32),
}

/// Active deck filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub levels: BTreeSet<MasteryLevel>,
    pub parts: BTreeSet<u32>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            levels: MasteryLevel::ALL.into_iter().collect(),
            parts: BTreeSet::new(),
        }
    }
}

impl Filters {
    pub fn new(
        levels: impl IntoIterator<Item = MasteryLevel>,
        parts: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            levels: levels.into_iter().collect(),
            parts: parts.into_iter().collect(),
        }
    }

    /// Whether the item passes both the level and the part filter.
    pub fn matches(&self, item: &ReviewableItem) -> bool {
        self.levels.contains(&item.level) && self.allows_part(item.item.part)
    }

    pub fn allows_part(&self, part: u32) -> bool {
        self.parts.contains(&part)
    }

    pub fn toggle(&mut self, toggle: FilterToggle) {
        match toggle {
            FilterToggle::Level(level) => self.toggle_level(level),
            FilterToggle::Part(part) => self.toggle_part(part),
        }
    }

    pub fn toggle_level(&mut self, level: MasteryLevel) {
        if !self.levels.remove(&level) {
            self.levels.insert(level);
        }
    }

    pub fn toggle_part(&mut self, part: u32) {
        if !self.parts.remove(&part) {
            self.parts.insert(part);
        }
    }
}
