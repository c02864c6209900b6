//! User-facing feedback for session transitions.

use serde::Serialize;
use vocab_core::types::AnswerOutcome;

/// Tone of a feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Success,
    Warning,
    Error,
    Neutral,
}

impl Default for FeedbackKind {
    fn default() -> Self {
        Self::Neutral
    }
}

/// Message shown after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Feedback {
    pub message: String,
    pub kind: FeedbackKind,
}

impl Feedback {
    fn new(message: impl Into<String>, kind: FeedbackKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Feedback after an answer, give-up or skip on an item whose accepted
    /// answer is `solution`.
    pub fn for_outcome(outcome: AnswerOutcome, solution: &str) -> Self {
        match outcome {
            AnswerOutcome::Exact => Self::new("Correct!", FeedbackKind::Success),
            AnswerOutcome::Fuzzy => Self::new(
                format!("Close enough! Correct: \"{solution}\""),
                FeedbackKind::Warning,
            ),
            AnswerOutcome::Incorrect => Self::new(
                format!("Incorrect. Solution: \"{solution}\""),
                FeedbackKind::Error,
            ),
            AnswerOutcome::GivenUp => Self::new(
                format!("Keep practicing! Solution: \"{solution}\""),
                FeedbackKind::Warning,
            ),
            AnswerOutcome::Skipped => Self::new(
                format!("Skipped. Solution: \"{solution}\""),
                FeedbackKind::Neutral,
            ),
        }
    }

    /// Steady state when no item passes the filters and is due.
    pub fn nothing_due() -> Self {
        Self::new(
            "No due cards match current filters! Check back tomorrow or change filters.",
            FeedbackKind::Neutral,
        )
    }
}
