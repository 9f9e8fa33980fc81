//! Keeps the progress map in step with the card set.
//!
//! This is the only place states are created or dropped: every card gets
//! exactly one state, and states whose card is gone are discarded.

use crate::models::{Item, ScheduleState, StateMap, Status, Timestamp};

/// Fresh state for a card that has never been reviewed. Due immediately.
pub fn create_initial_state(item_id: &str, now: Timestamp) -> ScheduleState {
    ScheduleState {
        item_id: item_id.to_string(),
        ease_factor: 2.5,
        interval_days: 0.0,
        repetition_count: 0,
        due_at: now,
        lapse_count: 0,
        status: Status::New,
    }
}

/// Produces one state per item, reusing existing states by id.
pub fn reconcile<I: Item>(items: &[I], existing: Option<&StateMap>, now: Timestamp) -> StateMap {
    items
        .iter()
        .map(|item| {
            let state = existing
                .and_then(|states| states.get(item.id()))
                .cloned()
                .unwrap_or_else(|| create_initial_state(item.id(), now));
            (item.id().to_string(), state)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, Rating, SchedulerConfig};
    use crate::scheduler::rate;

    fn card(id: &str) -> Card {
        Card {
            id: id.to_string(),
            sentence: format!("sentence {}", id),
            bold_word: id.to_string(),
            translation: format!("translation {}", id),
        }
    }

    #[test]
    fn test_initial_state() {
        let state = create_initial_state("c1", 1234);
        assert_eq!(state.item_id, "c1");
        assert_eq!(state.ease_factor, 2.5);
        assert_eq!(state.interval_days, 0.0);
        assert_eq!(state.repetition_count, 0);
        assert_eq!(state.due_at, 1234);
        assert_eq!(state.lapse_count, 0);
        assert_eq!(state.status, Status::New);
    }

    #[test]
    fn test_reconcile_initializes_every_card() {
        let cards = vec![card("1"), card("2"), card("3"), card("4")];
        let progress = reconcile(&cards, None, 500);

        assert_eq!(progress.len(), 4);
        for c in &cards {
            let state = &progress[&c.id];
            assert_eq!(state.item_id, c.id);
            assert_eq!(state.status, Status::New);
            assert_eq!(state.due_at, 500);
        }
    }

    #[test]
    fn test_reconcile_is_a_bijection() {
        let cards = vec![card("a"), card("b")];
        let mut existing = reconcile(&[card("a"), card("gone")], None, 0);
        existing.insert("orphan".to_string(), create_initial_state("orphan", 0));

        let progress = reconcile(&cards, Some(&existing), 10);
        let keys: Vec<_> = progress.keys().cloned().collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        for (id, state) in &progress {
            assert_eq!(id, &state.item_id);
        }
    }

    #[test]
    fn test_reconcile_preserves_existing_progress() {
        let config = SchedulerConfig::default();
        let cards = vec![card("a"), card("b")];
        let mut progress = reconcile(&cards, None, 0);
        let rated = rate(&progress["a"], Rating::Good, 0, &config);
        progress.insert("a".to_string(), rated.clone());

        let cards = vec![card("a"), card("b"), card("c")];
        let next = reconcile(&cards, Some(&progress), 99);
        assert_eq!(next["a"], rated);
        assert_eq!(next["b"].due_at, 0);
        assert_eq!(next["c"].due_at, 99);
        assert_eq!(next["c"].status, Status::New);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let cards = vec![card("x"), card("y"), card("z")];
        let first = reconcile(&cards, None, 77);
        let second = reconcile(&cards, Some(&first), 77);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_reconcile_collapses_duplicate_ids() {
        let cards = vec![card("dup"), card("dup")];
        let progress = reconcile(&cards, None, 0);
        assert_eq!(progress.len(), 1);
    }

    #[test]
    fn test_reconcile_empty_card_set_drops_everything() {
        let existing = reconcile(&[card("a")], None, 0);
        let cards: Vec<Card> = Vec::new();
        assert!(reconcile(&cards, Some(&existing), 0).is_empty());
    }
}
