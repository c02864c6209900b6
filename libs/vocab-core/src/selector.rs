//! Next-item selection over a filtered, due-aware deck.

use crate::types::{Filters, ReviewableItem};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

/// Number of most overdue items the next one is drawn from.
pub const CANDIDATE_POOL_SIZE: usize = 5;

/// Items that pass the filters and are due at `now`, most overdue first.
pub fn due_items<'a>(
    items: &'a [ReviewableItem],
    filters: &Filters,
    now: DateTime<Utc>,
) -> Vec<&'a ReviewableItem> {
    let mut due: Vec<&ReviewableItem> = items
        .iter()
        .filter(|item| filters.matches(item) && item.is_due(now))
        .collect();
    due.sort_by_key(|item| item.memory.next_review);
    due
}

/// Pick the next item to present.
///
/// Draws uniformly from the `CANDIDATE_POOL_SIZE` most overdue items so the
/// order is not fully predictable. Returns `None` when nothing is due.
pub fn select_next<'a, R: Rng + ?Sized>(
    items: &'a [ReviewableItem],
    filters: &Filters,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<&'a ReviewableItem> {
    let due = due_items(items, filters, now);
    let pool = &due[..due.len().min(CANDIDATE_POOL_SIZE)];
    pool.choose(rng).copied()
}
