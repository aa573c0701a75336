//! The per-visitor task state machine.

use linkgate_types::{Campaign, GuestId, TaskId, TaskStatus, VisitorProgress};

use crate::error::TrackerError;
use crate::store::ProgressStore;
use crate::unlock::is_unlocked;

/// Result of activating a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The task moved to `Loading`; the caller should run verification and
    /// report back with `complete` or `fail`.
    Started,
    /// The task was already completed; nothing changed and nothing was
    /// persisted.
    AlreadyCompleted,
}

/// Client-held progress tracker for one campaign.
///
/// Every transition is persisted synchronously, so a reload mid-flow
/// resumes from the last committed status.
pub struct Tracker<S: ProgressStore> {
    campaign: Campaign,
    store: S,
    progress: VisitorProgress,
}

impl<S: ProgressStore> Tracker<S> {
    /// Open the tracker for a campaign: rehydrate the stored record, or
    /// mint a fresh guest identity with an all-pending task list and
    /// persist it immediately.
    pub fn open(campaign: Campaign, store: S) -> Result<Self, TrackerError> {
        let progress = match store.load(&campaign.id)? {
            Some(mut progress) => {
                // A Loading status cannot survive a reload: no verification
                // request is actually in flight anymore. Reset to Pending so
                // the task can be re-activated.
                for status in progress.statuses.values_mut() {
                    if *status == TaskStatus::Loading {
                        *status = TaskStatus::Pending;
                    }
                }
                // Tasks missing a status entry default to Pending.
                for task in &campaign.tasks {
                    progress.statuses.entry(task.id).or_insert(TaskStatus::Pending);
                }
                progress
            }
            None => {
                let fresh = VisitorProgress::new(
                    GuestId::generate(),
                    campaign.tasks.iter().map(|t| t.id),
                );
                store.save(&campaign.id, &fresh)?;
                tracing::debug!(campaign = %campaign.id, guest = %fresh.guest_id, "initialized visitor progress");
                fresh
            }
        };

        let mut tracker = Self {
            campaign,
            store,
            progress,
        };
        tracker.persist()?;
        Ok(tracker)
    }

    /// Activate a task: `Pending -> Loading`. Idempotent on completed
    /// tasks; rejects re-activation while a verification is in flight.
    pub fn begin(&mut self, task_id: &TaskId) -> Result<Activation, TrackerError> {
        match self.status(task_id) {
            None => Err(TrackerError::UnknownTask(*task_id)),
            Some(TaskStatus::Completed) => Ok(Activation::AlreadyCompleted),
            Some(TaskStatus::Loading) => Err(TrackerError::AlreadyInFlight(*task_id)),
            Some(TaskStatus::Pending) => {
                self.progress.statuses.insert(*task_id, TaskStatus::Loading);
                self.persist()?;
                Ok(Activation::Started)
            }
        }
    }

    /// Record a successful verification: `Loading -> Completed`, then
    /// recompute the unlock flag. Completed tasks stay completed.
    pub fn complete(&mut self, task_id: &TaskId) -> Result<(), TrackerError> {
        match self.status(task_id) {
            None => Err(TrackerError::UnknownTask(*task_id)),
            Some(TaskStatus::Completed) => Ok(()),
            Some(TaskStatus::Pending) => Err(TrackerError::NotInFlight(*task_id)),
            Some(TaskStatus::Loading) => {
                self.progress
                    .statuses
                    .insert(*task_id, TaskStatus::Completed);
                self.progress.unlocked = is_unlocked(&self.progress.statuses);
                self.persist()?;
                tracing::info!(
                    campaign = %self.campaign.id,
                    task = %task_id,
                    unlocked = self.progress.unlocked,
                    "task completed"
                );
                Ok(())
            }
        }
    }

    /// Record a failed verification: `Loading -> Pending`. The error that
    /// caused the failure is the caller's to surface; the tracker only
    /// reverts the status.
    pub fn fail(&mut self, task_id: &TaskId) -> Result<(), TrackerError> {
        match self.status(task_id) {
            None => Err(TrackerError::UnknownTask(*task_id)),
            Some(TaskStatus::Loading) => {
                self.progress.statuses.insert(*task_id, TaskStatus::Pending);
                self.persist()?;
                Ok(())
            }
            Some(_) => Err(TrackerError::NotInFlight(*task_id)),
        }
    }

    pub fn status(&self, task_id: &TaskId) -> Option<TaskStatus> {
        self.progress.statuses.get(task_id).copied()
    }

    /// Cached unlock flag; true only when every task is completed.
    pub fn unlocked(&self) -> bool {
        self.progress.unlocked
    }

    pub fn progress(&self) -> &VisitorProgress {
        &self.progress
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    fn persist(&mut self) -> Result<(), TrackerError> {
        self.progress.unlocked = is_unlocked(&self.progress.statuses);
        self.store.save(&self.campaign.id, &self.progress)
    }
}
