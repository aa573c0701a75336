//! Visitor-side progress tracking.
//!
//! The tracker is the client-held state machine over a campaign's task
//! list: it rehydrates from local storage on open, persists every
//! transition synchronously, and recomputes the unlock flag after each
//! mutation. It is a convenience cache; server-verified tasks are
//! confirmed server-side first and only then cached here.

mod error;
mod store;
mod tracker;
mod unlock;

pub use error::TrackerError;
pub use store::{InMemoryProgressStore, JsonFileProgressStore, ProgressStore};
pub use tracker::{Activation, Tracker};
pub use unlock::is_unlocked;
