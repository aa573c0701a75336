//! Client-held visitor progress.

use crate::ids::{GuestId, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-task status as seen by the visitor's device.
///
/// Transitions are monotonic: `Pending -> Loading -> Completed`, with
/// `Loading -> Pending` on verification failure. A completed task never
/// reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Loading,
    Completed,
}

/// The locally persisted progress record for one campaign.
///
/// This is a convenience rehydration cache, not the source of truth:
/// server-verified tasks (the email code) are confirmed server-side first
/// and only then cached here. Reconciliation is strictly one-way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorProgress {
    pub guest_id: GuestId,
    pub statuses: HashMap<TaskId, TaskStatus>,
    pub unlocked: bool,
}

impl VisitorProgress {
    pub fn new(guest_id: GuestId, task_ids: impl IntoIterator<Item = TaskId>) -> Self {
        Self {
            guest_id,
            statuses: task_ids
                .into_iter()
                .map(|id| (id, TaskStatus::Pending))
                .collect(),
            unlocked: false,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.statuses
            .values()
            .filter(|s| **s == TaskStatus::Completed)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_progress_is_all_pending() {
        let tasks = vec![TaskId::generate(), TaskId::generate()];
        let progress = VisitorProgress::new(GuestId::generate(), tasks.clone());

        assert!(!progress.unlocked);
        assert_eq!(progress.statuses.len(), 2);
        assert!(progress
            .statuses
            .values()
            .all(|s| *s == TaskStatus::Pending));
        assert_eq!(progress.completed_count(), 0);
    }
}
