//! Tracker errors.

use linkgate_types::TaskId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// The task is not part of this campaign.
    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),

    /// The task already has a verification in flight.
    #[error("Verification already in flight for task: {0}")]
    AlreadyInFlight(TaskId),

    /// A completion/failure was reported for a task that was never started.
    #[error("No verification in flight for task: {0}")]
    NotInFlight(TaskId),

    /// Local persistence failed.
    #[error("Progress persistence error: {0}")]
    Persist(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
