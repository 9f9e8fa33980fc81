pub mod card;
pub mod default_cards;
pub mod rating;
pub mod review_session;
pub mod schedule_state;
pub mod scheduler_config;

pub use card::{Card, Item};
pub use default_cards::default_cards;
pub use rating::Rating;
pub use review_session::ReviewSession;
pub use schedule_state::{
    MILLIS_PER_DAY, MILLIS_PER_SECOND, ScheduleState, StateMap, Status, Timestamp,
};
pub use scheduler_config::SchedulerConfig;
