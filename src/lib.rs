pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod generator;
pub mod logging;
pub mod models;
pub mod scheduler;

pub use error::{FlashcardsError, Result};
pub use models::{Card, Rating, ReviewSession, ScheduleState, SchedulerConfig, StateMap, Status};
