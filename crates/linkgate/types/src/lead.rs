//! Server-side lead records.

use crate::ids::{CampaignId, LeadId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-task progress inside a lead record.
///
/// A pending entry holds a single-use code; once matched it is replaced by
/// the terminal `Completed` marker and the code can never verify again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskProgress {
    Pending {
        code: String,
        expires_at: DateTime<Utc>,
    },
    Completed,
}

impl TaskProgress {
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskProgress::Completed)
    }
}

/// Overall lead status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Pending,
    Completed,
}

/// One visitor's server-side progress on one campaign.
///
/// Created on the first verification attempt for a (campaign, email) pair
/// and upserted on every subsequent attempt. Never deleted by the gate
/// subsystem. Authoritative for server-checked tasks (the email code);
/// social tasks are only tracked in the visitor's local cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub campaign_id: CampaignId,
    pub email: String,
    #[serde(default)]
    pub task_progress: HashMap<TaskId, TaskProgress>,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    pub fn new(campaign_id: CampaignId, email: impl Into<String>) -> Self {
        Self {
            id: LeadId::generate(),
            campaign_id,
            email: email.into(),
            task_progress: HashMap::new(),
            status: LeadStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Number of tasks this lead has completed server-side.
    pub fn completed_tasks(&self) -> usize {
        self.task_progress
            .values()
            .filter(|p| p.is_completed())
            .count()
    }
}
