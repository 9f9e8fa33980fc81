//! Selects which cards are up for review.
use crate::models::{Item, StateMap, Timestamp};

/// Cards with `due_at <= now`, earliest first. Cards due at the same moment
/// keep their order in `items`. A card without a state is due immediately.
pub fn due_items<'a, I: Item>(items: &'a [I], states: &StateMap, now: Timestamp) -> Vec<&'a I> {
    let mut due: Vec<(&I, Timestamp)> = items
        .iter()
        .map(|item| (item, due_at_or_epoch(states, item)))
        .filter(|&(_, due_at)| due_at <= now)
        .collect();

    // Stable, so ties keep input order
    due.sort_by_key(|&(_, due_at)| due_at);

    due.into_iter().map(|(item, _)| item).collect()
}

/// Number of cards `due_items` would return.
pub fn due_count<I: Item>(items: &[I], states: &StateMap, now: Timestamp) -> usize {
    items
        .iter()
        .filter(|item| due_at_or_epoch(states, *item) <= now)
        .count()
}

/// Earliest due time strictly after `now`, if any card is waiting.
pub fn next_due_at(states: &StateMap, now: Timestamp) -> Option<Timestamp> {
    states
        .values()
        .map(|state| state.due_at)
        .filter(|&due_at| due_at > now)
        .min()
}

fn due_at_or_epoch<I: Item>(states: &StateMap, item: &I) -> Timestamp {
    states.get(item.id()).map(|state| state.due_at).unwrap_or(0)
}
