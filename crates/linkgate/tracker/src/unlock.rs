//! Unlock evaluation.

use linkgate_types::{TaskId, TaskStatus};
use std::collections::HashMap;

/// Pure unlock predicate: every task completed, and at least one task.
///
/// A zero-task campaign never unlocks; empty gates are a configuration
/// error upstream, not an auto-unlock.
pub fn is_unlocked(statuses: &HashMap<TaskId, TaskStatus>) -> bool {
    !statuses.is_empty() && statuses.values().all(|s| *s == TaskStatus::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(values: &[TaskStatus]) -> HashMap<TaskId, TaskStatus> {
        values.iter().map(|s| (TaskId::generate(), *s)).collect()
    }

    #[test]
    fn test_all_completed_unlocks() {
        assert!(is_unlocked(&statuses(&[
            TaskStatus::Completed,
            TaskStatus::Completed
        ])));
    }

    #[test]
    fn test_any_pending_or_loading_blocks() {
        assert!(!is_unlocked(&statuses(&[
            TaskStatus::Completed,
            TaskStatus::Pending
        ])));
        assert!(!is_unlocked(&statuses(&[
            TaskStatus::Completed,
            TaskStatus::Loading
        ])));
    }

    #[test]
    fn test_zero_tasks_never_unlocks() {
        assert!(!is_unlocked(&HashMap::new()));
    }
}
