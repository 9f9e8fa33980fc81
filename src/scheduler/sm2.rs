//! SM-2 (SuperMemo 2) rating transition.
//!
//! Only the two extremes of the SM-2 quality scale are exposed to the learner:
//! - "again" is quality 0 and pulls the easiness factor (EF) toward its floor
//! - "good" is quality 5 and raises EF by 0.1
//! - EF is updated on every rating, before the card's status is looked at
//! - New, learning and relearning cards retry after a short delay on "again"
//!   and graduate to review with a fixed interval on "good"
//! - Review cards lapse to relearning on "again" and grow their interval by
//!   EF times the good bonus on "good"

use crate::models::{
    MILLIS_PER_DAY, MILLIS_PER_SECOND, Rating, ScheduleState, SchedulerConfig, Status, Timestamp,
};

/// Calculates the next scheduling state for a card after it has been rated.
pub fn rate(
    state: &ScheduleState,
    rating: Rating,
    now: Timestamp,
    config: &SchedulerConfig,
) -> ScheduleState {
    let ease_factor = ease_after(state.ease_factor, rating.quality(), config.min_ease_factor);
    let retry_at = now + config.learning_again_delay_seconds * MILLIS_PER_SECOND;

    match (state.status, rating) {
        (Status::New, Rating::Again) => ScheduleState {
            ease_factor,
            due_at: retry_at,
            status: Status::Learning,
            ..state.clone()
        },
        // Stays in whichever learning phase it was in
        (Status::Learning | Status::Relearning, Rating::Again) => ScheduleState {
            ease_factor,
            due_at: retry_at,
            ..state.clone()
        },
        (Status::New | Status::Learning | Status::Relearning, Rating::Good) => {
            let interval_days = config.initial_good_interval_days;
            ScheduleState {
                ease_factor,
                repetition_count: 1,
                interval_days,
                due_at: add_days(now, interval_days),
                status: Status::Review,
                ..state.clone()
            }
        }
        (Status::Review, Rating::Again) => ScheduleState {
            ease_factor,
            repetition_count: 0,
            interval_days: 0.0,
            due_at: retry_at,
            lapse_count: state.lapse_count + 1,
            status: Status::Relearning,
            ..state.clone()
        },
        (Status::Review, Rating::Good) => {
            let interval_days = (state.interval_days * ease_factor * config.good_bonus)
                .round()
                .max(1.0);
            ScheduleState {
                ease_factor,
                repetition_count: state.repetition_count + 1,
                interval_days,
                due_at: add_days(now, interval_days),
                ..state.clone()
            }
        }
    }
}

/// SM-2 easiness update: EF' = EF + 0.1 - (5 - q) * (0.08 + (5 - q) * 0.02),
/// rounded to two decimals and clamped at `min_ease`.
pub fn ease_after(ease_factor: f64, quality: u8, min_ease: f64) -> f64 {
    let diff = 5.0 - f64::from(quality.min(5));
    let next = ease_factor + 0.1 - diff * (0.08 + diff * 0.02);
    round2(next).max(min_ease)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn add_days(base: Timestamp, days: f64) -> Timestamp {
    base + (days * MILLIS_PER_DAY as f64).round() as i64
}
