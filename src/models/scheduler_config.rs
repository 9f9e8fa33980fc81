//! Tunables for the rating transition.
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Floor for the easiness factor.
    pub min_ease_factor: f64,
    /// Extra multiplier applied on top of the ease when a review card is answered "good".
    pub good_bonus: f64,
    /// Retry delay after "again" while new, learning or relearning.
    pub learning_again_delay_seconds: i64,
    /// Interval assigned when a card graduates to review.
    pub initial_good_interval_days: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_ease_factor: 1.3,
            good_bonus: 1.15,
            learning_again_delay_seconds: 30,
            initial_good_interval_days: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SchedulerConfig = serde_json::from_str(r#"{"good_bonus": 1.3}"#).unwrap();
        assert_eq!(config.good_bonus, 1.3);
        assert_eq!(config.min_ease_factor, 1.3);
        assert_eq!(config.learning_again_delay_seconds, 30);
        assert_eq!(config.initial_good_interval_days, 2.0);
    }
}
