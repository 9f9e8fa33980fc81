//! Per-card scheduling state, stored as-is in the progress table and JSON export.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

pub const MILLIS_PER_SECOND: i64 = 1000;
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * MILLIS_PER_SECOND;

/// Progress for a whole card set, keyed by card id.
/// Ordered so that serialization is stable.
pub type StateMap = BTreeMap<String, ScheduleState>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Learning,
    Review,
    Relearning,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Learning => "learning",
            Status::Review => "review",
            Status::Relearning => "relearning",
        }
    }

    pub fn parse(value: &str) -> Option<Status> {
        match value {
            "new" => Some(Status::New),
            "learning" => Some(Status::Learning),
            "review" => Some(Status::Review),
            "relearning" => Some(Status::Relearning),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleState {
    pub item_id: String,
    pub ease_factor: f64,
    pub interval_days: f64,
    pub repetition_count: u32,
    pub due_at: Timestamp,
    pub lapse_count: u32,
    pub status: Status,
}

impl ScheduleState {
    pub fn is_due(&self, now: Timestamp) -> bool {
        now >= self.due_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        for status in [Status::New, Status::Learning, Status::Review, Status::Relearning] {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("graduated"), None);
    }

    #[test]
    fn test_serialized_shape() {
        let state = ScheduleState {
            item_id: "c1".to_string(),
            ease_factor: 2.5,
            interval_days: 0.0,
            repetition_count: 0,
            due_at: 1000,
            lapse_count: 0,
            status: Status::Relearning,
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["itemId"], "c1");
        assert_eq!(value["easeFactor"], 2.5);
        assert_eq!(value["repetitionCount"], 0);
        assert_eq!(value["dueAt"], 1000);
        assert_eq!(value["lapseCount"], 0);
        assert_eq!(value["status"], "relearning");
    }

    #[test]
    fn test_is_due_at_boundary() {
        let state = ScheduleState {
            item_id: "c1".to_string(),
            ease_factor: 2.5,
            interval_days: 0.0,
            repetition_count: 0,
            due_at: 5000,
            lapse_count: 0,
            status: Status::New,
        };
        assert!(!state.is_due(4999));
        assert!(state.is_due(5000));
    }
}
