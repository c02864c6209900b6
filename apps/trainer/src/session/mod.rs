//! Study session state machine.
//!
//! `Idle -> Presenting -> Reviewing -> Presenting -> ...`
//!
//! Every transition runs to completion on `&mut self`. Transitions that are
//! not valid in the current phase are no-ops and return `None`/`false`.
//! Persistence is not performed here: answer transitions hand back a
//! [`PersistRequest`] for the caller to dispatch.

pub mod feedback;

pub use feedback::{Feedback, FeedbackKind};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use vocab_core::algorithm::SpacedRepetitionAlgorithm;
use vocab_core::level::LevelStats;
use vocab_core::matching::compare_answer;
use vocab_core::selector::{due_items, select_next};
use vocab_core::types::{
    AnswerOutcome, FilterToggle, Filters, MemoryState, ReviewableItem, VocabularyItem,
};

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing loaded yet.
    Idle,
    /// Front of the current item shown, or nothing due.
    Presenting,
    /// Back of the current item and the result shown.
    Reviewing,
}

/// Whether the last turn was right or wrong. Skips have no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LastResult {
    Success,
    Error,
}

/// How a skip affects memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipPolicy {
    /// Schedule the skip as quality 0 and persist it.
    Record,
    /// Leave memory state untouched.
    Ignore,
}

/// Transient, UI-facing session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub current_item_id: Option<i64>,
    pub reviewing: bool,
    pub last_result: Option<LastResult>,
    pub last_outcome: Option<AnswerOutcome>,
    pub feedback: Feedback,
}

/// New memory state to write for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistRequest {
    pub item_id: i64,
    pub state: MemoryState,
}

/// Result of an answer, give-up or skip.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub item_id: i64,
    pub outcome: AnswerOutcome,
    pub feedback: Feedback,
    /// Set when a persistence backend is configured and the state changed.
    pub persist: Option<PersistRequest>,
}

/// Identifies one load. A ticket issued before a reset or a newer load is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Session context: items, filters and the state machine.
pub struct SessionController {
    items: Vec<ReviewableItem>,
    index: HashMap<i64, usize>,
    filters: Filters,
    state: SessionState,
    phase: Phase,
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
    persistence: bool,
    skip_policy: SkipPolicy,
    loading: bool,
    generation: u64,
    rng: StdRng,
}

impl SessionController {
    /// Create an idle session. With `persistence` off, skips leave memory
    /// state untouched and no persist requests are emitted.
    pub fn new(algorithm: Box<dyn SpacedRepetitionAlgorithm>, filters: Filters, persistence: bool) -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            filters,
            state: SessionState::default(),
            phase: Phase::Idle,
            algorithm,
            persistence,
            skip_policy: if persistence {
                SkipPolicy::Record
            } else {
                SkipPolicy::Ignore
            },
            loading: false,
            generation: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed seed for item selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn items(&self) -> &[ReviewableItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether answers produce persist requests and progress should be loaded.
    pub fn persistence(&self) -> bool {
        self.persistence
    }

    pub fn skip_policy(&self) -> SkipPolicy {
        self.skip_policy
    }

    pub fn item(&self, id: i64) -> Option<&ReviewableItem> {
        self.index.get(&id).map(|&idx| &self.items[idx])
    }

    pub fn current_item(&self) -> Option<&ReviewableItem> {
        self.state.current_item_id.and_then(|id| self.item(id))
    }

    /// Mark a load as in flight. Answers are rejected until it finishes.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket(self.generation)
    }

    /// Merge the catalog with stored progress and present the first item.
    ///
    /// Returns `false` and changes nothing if the ticket is stale.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        catalog: Vec<VocabularyItem>,
        mut progress: HashMap<i64, MemoryState>,
    ) -> bool {
        if !self.loading || ticket.0 != self.generation {
            tracing::debug!(ticket = ticket.0, current = self.generation, "ignoring stale load");
            return false;
        }

        let now = Utc::now();
        self.items = catalog
            .into_iter()
            .map(|word| {
                let stored = progress.remove(&word.id);
                ReviewableItem::merge(word, stored, now)
            })
            .collect();
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.id(), idx))
            .collect();

        if self.filters.parts.is_empty() {
            self.filters.parts = self.items.iter().map(|item| item.item.part).collect::<BTreeSet<_>>();
        }

        self.loading = false;
        tracing::debug!(items = self.items.len(), orphaned = progress.len(), "session loaded");
        self.present_next();
        true
    }

    /// Drop all items and invalidate any load in flight.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.items.clear();
        self.index.clear();
        self.state = SessionState::default();
        self.phase = Phase::Idle;
    }

    /// Check a typed answer against the current item.
    ///
    /// Empty or whitespace-only input is rejected without a transition.
    pub fn submit_answer(&mut self, input: &str) -> Option<Review> {
        if input.trim().is_empty() {
            return None;
        }
        let target = &self.presenting_item()?.item.target;
        let outcome = compare_answer(input, target).verdict.outcome();
        self.review(outcome)
    }

    /// Reveal the answer, scored as incorrect.
    pub fn give_up(&mut self) -> Option<Review> {
        self.presenting_item()?;
        self.review(AnswerOutcome::GivenUp)
    }

    /// Reveal the answer without answering. See [`SkipPolicy`].
    pub fn skip(&mut self) -> Option<Review> {
        self.presenting_item()?;
        self.review(AnswerOutcome::Skipped)
    }

    /// Leave the review screen and present the next due item.
    pub fn advance_to_next(&mut self) -> bool {
        if self.loading || self.phase != Phase::Reviewing {
            return false;
        }
        self.present_next();
        true
    }

    /// Re-run selection while nothing is due, e.g. after changing filters.
    pub fn refresh(&mut self) -> bool {
        if self.loading || self.phase != Phase::Presenting || self.state.current_item_id.is_some() {
            return false;
        }
        self.present_next();
        true
    }

    /// Flip one level or part in the active filters. Takes effect on the next
    /// selection; the item on screen stays.
    pub fn toggle_filter(&mut self, toggle: FilterToggle) {
        self.filters.toggle(toggle);
    }

    /// Per-level counts over the parts currently selected.
    pub fn stats(&self) -> LevelStats {
        LevelStats::collect(&self.items, &self.filters)
    }

    /// Number of items that pass the filters and are due now.
    pub fn due_count(&self) -> usize {
        due_items(&self.items, &self.filters, Utc::now()).len()
    }

    fn presenting_item(&self) -> Option<&ReviewableItem> {
        if self.loading || self.phase != Phase::Presenting {
            return None;
        }
        self.current_item()
    }

    fn review(&mut self, outcome: AnswerOutcome) -> Option<Review> {
        let item_id = self.state.current_item_id?;
        let idx = *self.index.get(&item_id)?;

        let record = outcome != AnswerOutcome::Skipped || self.skip_policy == SkipPolicy::Record;
        let persist = if record {
            let item = &mut self.items[idx];
            let result = self
                .algorithm
                .schedule(&item.memory, outcome.quality(), Utc::now());
            item.apply(result.new_state);
            self.persistence.then(|| PersistRequest {
                item_id,
                state: item.memory.clone(),
            })
        } else {
            None
        };

        let feedback = Feedback::for_outcome(outcome, &self.items[idx].item.target);
        self.phase = Phase::Reviewing;
        self.state.reviewing = true;
        self.state.last_outcome = Some(outcome);
        self.state.last_result = match outcome {
            AnswerOutcome::Exact | AnswerOutcome::Fuzzy => Some(LastResult::Success),
            AnswerOutcome::Incorrect | AnswerOutcome::GivenUp => Some(LastResult::Error),
            AnswerOutcome::Skipped => None,
        };
        self.state.feedback = feedback.clone();

        tracing::debug!(item_id, ?outcome, recorded = record, "item reviewed");
        Some(Review {
            item_id,
            outcome,
            feedback,
            persist,
        })
    }

    fn present_next(&mut self) {
        let next = select_next(&self.items, &self.filters, Utc::now(), &mut self.rng).map(|item| item.id());
        self.phase = Phase::Presenting;
        self.state = SessionState {
            current_item_id: next,
            feedback: if next.is_some() {
                Feedback::default()
            } else {
                Feedback::nothing_due()
            },
            ..SessionState::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use vocab_core::algorithm::get_algorithm;
    use vocab_core::types::MasteryLevel;

    fn word(id: i64, part: u32, target: &str) -> VocabularyItem {
        VocabularyItem {
            id,
            part,
            source: format!("palabra {id}"),
            target: target.to_string(),
            kind: Some("noun".to_string()),
            example: String::new(),
        }
    }

    fn session(persistence: bool) -> SessionController {
        let algorithm = get_algorithm("sm2").unwrap();
        SessionController::new(algorithm, Filters::default(), persistence).with_seed(11)
    }

    fn loaded(persistence: bool, catalog: Vec<VocabularyItem>) -> SessionController {
        let mut session = session(persistence);
        let ticket = session.begin_load();
        assert!(session.finish_load(ticket, catalog, HashMap::new()));
        session
    }

    fn current_target(session: &SessionController) -> String {
        session.current_item().unwrap().item.target.clone()
    }

    #[test]
    fn starts_idle_and_rejects_answers() {
        let mut session = session(true);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.submit_answer("dog").is_none());
        assert!(session.give_up().is_none());
        assert!(session.skip().is_none());
        assert!(!session.advance_to_next());
    }

    #[test]
    fn load_presents_an_item_and_fills_parts() {
        let session = loaded(true, vec![word(1, 1, "dog"), word(2, 3, "cat")]);
        assert_eq!(session.phase(), Phase::Presenting);
        assert!(session.current_item().is_some());
        assert_eq!(session.filters().parts, BTreeSet::from([1, 3]));
        assert_eq!(session.stats().counts, [2, 0, 0, 0]);
        assert_eq!(session.due_count(), 2);
    }

    #[test]
    fn load_merges_stored_progress() {
        let mut session = session(true);
        let stored = MemoryState {
            repetition: 3,
            interval_days: 15,
            easiness_factor: 2.4,
            next_review: Utc::now() + Duration::days(15),
        };
        let ticket = session.begin_load();
        session.finish_load(
            ticket,
            vec![word(1, 1, "dog"), word(2, 1, "cat")],
            HashMap::from([(2, stored.clone())]),
        );

        let item = session.item(2).unwrap();
        assert_eq!(item.memory, stored);
        assert_eq!(item.level, MasteryLevel::Familiar);
        assert_eq!(session.state().current_item_id, Some(1));
    }

    #[test]
    fn exact_answer_advances_memory_and_emits_persist() {
        let mut session = loaded(true, vec![word(1, 1, "dog")]);
        let review = session.submit_answer(" Dog ").unwrap();

        assert_eq!(review.outcome, AnswerOutcome::Exact);
        assert_eq!(review.feedback.message, "Correct!");
        assert_eq!(review.feedback.kind, FeedbackKind::Success);
        assert_eq!(session.phase(), Phase::Reviewing);
        assert_eq!(session.state().last_result, Some(LastResult::Success));

        let item = session.item(1).unwrap();
        assert_eq!(item.memory.repetition, 1);
        assert_eq!(item.memory.interval_days, 1);
        assert!((item.memory.easiness_factor - 2.6).abs() < 1e-9);
        assert_eq!(item.level, MasteryLevel::Learning);

        let persist = review.persist.unwrap();
        assert_eq!(persist.item_id, 1);
        assert_eq!(persist.state, item.memory);
    }

    #[test]
    fn fuzzy_and_incorrect_feedback() {
        let mut session = loaded(true, vec![word(1, 1, "perro")]);
        let review = session.submit_answer("perr").unwrap();
        assert_eq!(review.outcome, AnswerOutcome::Fuzzy);
        assert_eq!(review.feedback.message, "Close enough! Correct: \"perro\"");
        assert_eq!(review.feedback.kind, FeedbackKind::Warning);

        let mut session = loaded(true, vec![word(1, 1, "perro")]);
        let review = session.submit_answer("xyz").unwrap();
        assert_eq!(review.outcome, AnswerOutcome::Incorrect);
        assert_eq!(review.feedback.kind, FeedbackKind::Error);
        assert_eq!(session.state().last_result, Some(LastResult::Error));
        assert_eq!(session.item(1).unwrap().memory.repetition, 0);
        assert_eq!(session.item(1).unwrap().memory.interval_days, 1);
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut session = loaded(true, vec![word(1, 1, "dog")]);
        assert!(session.submit_answer("   ").is_none());
        assert_eq!(session.phase(), Phase::Presenting);
    }

    #[test]
    fn only_one_answer_per_presentation() {
        let mut session = loaded(true, vec![word(1, 1, "dog")]);
        assert!(session.submit_answer("dog").is_some());
        assert!(session.submit_answer("dog").is_none());
        assert!(session.give_up().is_none());
        assert!(session.skip().is_none());
        assert_eq!(session.item(1).unwrap().memory.repetition, 1);
    }

    #[test]
    fn give_up_counts_as_incorrect() {
        let mut session = loaded(true, vec![word(1, 1, "dog")]);
        let review = session.give_up().unwrap();
        assert_eq!(review.outcome, AnswerOutcome::GivenUp);
        assert_eq!(review.feedback.message, "Keep practicing! Solution: \"dog\"");
        assert_eq!(review.feedback.kind, FeedbackKind::Warning);
        let item = session.item(1).unwrap();
        assert_eq!(item.memory.interval_days, 1);
        assert!((item.memory.easiness_factor - 1.96).abs() < 1e-9);
        assert!(review.persist.is_some());
    }

    #[test]
    fn skip_is_recorded_with_persistence() {
        let mut session = loaded(true, vec![word(1, 1, "dog")]);
        assert_eq!(session.skip_policy(), SkipPolicy::Record);
        let review = session.skip().unwrap();
        assert_eq!(review.outcome, AnswerOutcome::Skipped);
        assert_eq!(session.state().last_result, None);
        assert!((session.item(1).unwrap().memory.easiness_factor - 1.7).abs() < 1e-9);
        assert!(review.persist.is_some());
    }

    #[test]
    fn skip_leaves_state_alone_in_local_mode() {
        let mut session = loaded(false, vec![word(1, 1, "dog")]);
        let before = session.item(1).unwrap().memory.clone();
        let review = session.skip().unwrap();
        assert_eq!(review.feedback.message, "Skipped. Solution: \"dog\"");
        assert!(review.persist.is_none());
        assert_eq!(session.item(1).unwrap().memory, before);
        assert_eq!(session.phase(), Phase::Reviewing);
    }

    #[test]
    fn local_mode_updates_memory_without_persisting() {
        let mut session = loaded(false, vec![word(1, 1, "dog")]);
        let review = session.submit_answer("dog").unwrap();
        assert!(review.persist.is_none());
        assert_eq!(session.item(1).unwrap().memory.repetition, 1);
    }

    #[test]
    fn advance_only_from_reviewing() {
        let mut session = loaded(true, vec![word(1, 1, "dog"), word(2, 1, "cat")]);
        assert!(!session.advance_to_next());

        let target = current_target(&session);
        session.submit_answer(&target).unwrap();
        assert!(session.advance_to_next());
        assert_eq!(session.phase(), Phase::Presenting);
        assert_eq!(session.state().feedback, Feedback::default());

        // The answered item is due tomorrow, so the other one comes up
        assert_ne!(current_target(&session), target);
    }

    #[test]
    fn nothing_due_is_a_steady_state() {
        let mut session = loaded(true, vec![word(1, 1, "dog")]);
        session.submit_answer("dog").unwrap();
        assert!(session.advance_to_next());

        assert_eq!(session.phase(), Phase::Presenting);
        assert!(session.current_item().is_none());
        assert_eq!(session.state().feedback, Feedback::nothing_due());
        assert!(session.submit_answer("dog").is_none());
        assert!(session.refresh());
    }

    #[test]
    fn filter_toggle_applies_on_next_selection() {
        let mut session = loaded(true, vec![word(1, 1, "dog"), word(2, 2, "cat")]);
        let first = session.state().current_item_id.unwrap();
        let first_part = session.item(first).unwrap().item.part;

        session.toggle_filter(FilterToggle::Part(first_part));
        assert_eq!(session.state().current_item_id, Some(first));

        session.give_up().unwrap();
        session.advance_to_next();
        let next = session.current_item().unwrap();
        assert_ne!(next.item.part, first_part);

        session.toggle_filter(FilterToggle::Level(MasteryLevel::New));
        session.give_up().unwrap();
        session.advance_to_next();
        assert!(session.current_item().is_none());
    }

    #[test]
    fn refresh_picks_up_filter_changes() {
        let mut session = loaded(true, vec![word(1, 1, "dog")]);
        session.toggle_filter(FilterToggle::Part(1));
        session.give_up().unwrap();
        session.advance_to_next();
        assert!(session.current_item().is_none());

        // Failed item is due tomorrow; nothing else to show
        session.toggle_filter(FilterToggle::Part(1));
        assert!(session.refresh());
        assert!(session.current_item().is_none());
        assert!(!session.advance_to_next());
    }

    #[test]
    fn answers_rejected_while_loading() {
        let mut session = loaded(true, vec![word(1, 1, "dog")]);
        let ticket = session.begin_load();
        assert!(session.is_loading());
        assert!(session.submit_answer("dog").is_none());
        assert!(session.give_up().is_none());

        assert!(session.finish_load(ticket, vec![word(1, 1, "dog")], HashMap::new()));
        assert!(session.submit_answer("dog").is_some());
    }

    #[test]
    fn advance_waits_for_load() {
        let mut session = loaded(true, vec![word(1, 1, "dog")]);
        session.submit_answer("dog").unwrap();
        let ticket = session.begin_load();

        assert!(!session.advance_to_next());
        assert_eq!(session.phase(), Phase::Reviewing);
        assert_eq!(session.state().current_item_id, Some(1));

        assert!(session.finish_load(ticket, vec![word(2, 1, "cat")], HashMap::new()));
        assert_eq!(session.phase(), Phase::Presenting);
        assert_eq!(session.state().current_item_id, Some(2));
    }

    #[test]
    fn stale_load_is_ignored() {
        let mut session = session(true);
        let first = session.begin_load();
        let second = session.begin_load();
        assert!(!session.finish_load(first, vec![word(1, 1, "dog")], HashMap::new()));
        assert!(session.items().is_empty());
        assert!(session.finish_load(second, vec![word(2, 1, "cat")], HashMap::new()));
        assert_eq!(session.items().len(), 1);

        let late = session.begin_load();
        session.reset();
        assert!(!session.finish_load(late, vec![word(3, 1, "cow")], HashMap::new()));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.items().is_empty());
    }

    #[test]
    fn empty_catalog_reports_nothing_due() {
        let session = loaded(true, Vec::new());
        assert_eq!(session.phase(), Phase::Presenting);
        assert_eq!(session.state().feedback, Feedback::nothing_due());
        assert_eq!(session.stats().total(), 0);
    }
}
