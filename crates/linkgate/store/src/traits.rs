//! Storage trait definitions.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use linkgate_types::{Campaign, CampaignId, Lead, TaskId};

/// Campaign storage. Campaigns are immutable after publish, so there is no
/// update operation.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    /// Insert a newly published campaign. Fails with `Conflict` if the ID
    /// already exists.
    async fn insert(&self, campaign: Campaign) -> Result<()>;

    /// Fetch a campaign by ID.
    async fn get(&self, id: &CampaignId) -> Result<Option<Campaign>>;

    /// List all campaigns, newest first.
    async fn list(&self) -> Result<Vec<Campaign>>;
}

/// Outcome of the atomic code-consumption update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeConsumption {
    /// Code matched and was unexpired; the entry is now `Completed`.
    Consumed,
    /// A pending entry exists but the submitted code does not match.
    Mismatch,
    /// The code matched but its expiry has passed.
    Expired,
    /// No pending entry for this task (never issued, or already consumed).
    NoPending,
    /// No lead exists for this (campaign, email) pair.
    LeadNotFound,
}

/// Lead storage keyed by (campaign, visitor email).
///
/// Emails are matched exactly as supplied; no normalization.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Fetch the lead for a (campaign, email) pair.
    async fn find(&self, campaign_id: &CampaignId, email: &str) -> Result<Option<Lead>>;

    /// Upsert the lead and set a pending code entry for the task,
    /// overwriting any previous pending code. At most one live code per
    /// task per lead.
    async fn put_pending_code(
        &self,
        campaign_id: &CampaignId,
        email: &str,
        task_id: &TaskId,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Lead>;

    /// Compare `submitted` against the pending code for the task and, if it
    /// matches and is unexpired, replace the entry with `Completed` as one
    /// conditional update. Implementations must not expose a window in
    /// which two callers can both observe the code as unconsumed.
    async fn consume_code(
        &self,
        campaign_id: &CampaignId,
        email: &str,
        task_id: &TaskId,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<CodeConsumption>;

    /// Flip the lead's overall status to completed. Returns `false` when no
    /// lead exists for the pair.
    async fn complete_lead(&self, campaign_id: &CampaignId, email: &str) -> Result<bool>;

    /// All leads for a campaign, newest first (dashboard listing / export).
    async fn list_for_campaign(&self, campaign_id: &CampaignId) -> Result<Vec<Lead>>;
}
