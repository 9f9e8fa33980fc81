//! Pure scheduling functions. Nothing here touches storage; callers persist
//! whatever these return.
pub mod due;
pub mod reconcile;
pub mod sm2;

pub use due::{due_count, due_items, next_due_at};
pub use reconcile::{create_initial_state, reconcile};
pub use sm2::{ease_after, rate};
