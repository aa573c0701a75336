//! In-memory storage backends for development and testing.
//!
//! Backed by `DashMap`; the lead map is keyed by (campaign, email). The
//! code-consumption update runs entirely under the entry guard, which is
//! what makes a one-time code single-use under concurrent checks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use linkgate_types::{Campaign, CampaignId, Lead, LeadStatus, TaskId, TaskProgress};
use std::sync::Arc;

use crate::error::{Result, StoreError};
use crate::traits::{CampaignStore, CodeConsumption, LeadStore};

/// In-memory campaign store.
pub struct InMemoryCampaignStore {
    campaigns: Arc<DashMap<CampaignId, Campaign>>,
}

impl InMemoryCampaignStore {
    pub fn new() -> Self {
        Self {
            campaigns: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryCampaignStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CampaignStore for InMemoryCampaignStore {
    async fn insert(&self, campaign: Campaign) -> Result<()> {
        if self.campaigns.contains_key(&campaign.id) {
            return Err(StoreError::Conflict(format!(
                "campaign {} already exists",
                campaign.id
            )));
        }
        tracing::debug!(campaign = %campaign.id, "campaign stored");
        self.campaigns.insert(campaign.id, campaign);
        Ok(())
    }

    async fn get(&self, id: &CampaignId) -> Result<Option<Campaign>> {
        Ok(self.campaigns.get(id).map(|c| c.clone()))
    }

    async fn list(&self) -> Result<Vec<Campaign>> {
        let mut all: Vec<Campaign> = self.campaigns.iter().map(|c| c.clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

/// In-memory lead store.
pub struct InMemoryLeadStore {
    leads: Arc<DashMap<(CampaignId, String), Lead>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self {
            leads: Arc::new(DashMap::new()),
        }
    }

    /// Total number of lead records across all campaigns.
    pub fn total_count(&self) -> usize {
        self.leads.len()
    }
}

impl Default for InMemoryLeadStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn find(&self, campaign_id: &CampaignId, email: &str) -> Result<Option<Lead>> {
        let key = (*campaign_id, email.to_string());
        Ok(self.leads.get(&key).map(|l| l.clone()))
    }

    async fn put_pending_code(
        &self,
        campaign_id: &CampaignId,
        email: &str,
        task_id: &TaskId,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Lead> {
        let key = (*campaign_id, email.to_string());
        let mut entry = self
            .leads
            .entry(key)
            .or_insert_with(|| Lead::new(*campaign_id, email));

        entry.task_progress.insert(
            *task_id,
            TaskProgress::Pending {
                code: code.to_string(),
                expires_at,
            },
        );

        // The code itself never hits the logs.
        tracing::debug!(
            campaign = %campaign_id,
            task = %task_id,
            %expires_at,
            "pending code stored"
        );

        Ok(entry.clone())
    }

    async fn consume_code(
        &self,
        campaign_id: &CampaignId,
        email: &str,
        task_id: &TaskId,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<CodeConsumption> {
        let key = (*campaign_id, email.to_string());
        let mut lead = match self.leads.get_mut(&key) {
            Some(lead) => lead,
            None => return Ok(CodeConsumption::LeadNotFound),
        };

        // The whole compare-and-mark runs under the entry guard.
        let outcome = match lead.task_progress.get(task_id) {
            None | Some(TaskProgress::Completed) => CodeConsumption::NoPending,
            Some(TaskProgress::Pending { code, expires_at }) => {
                if code != submitted {
                    CodeConsumption::Mismatch
                } else if now >= *expires_at {
                    CodeConsumption::Expired
                } else {
                    CodeConsumption::Consumed
                }
            }
        };

        if outcome == CodeConsumption::Consumed {
            lead.task_progress.insert(*task_id, TaskProgress::Completed);
            tracing::info!(campaign = %campaign_id, task = %task_id, "code consumed");
        }

        Ok(outcome)
    }

    async fn complete_lead(&self, campaign_id: &CampaignId, email: &str) -> Result<bool> {
        let key = (*campaign_id, email.to_string());
        match self.leads.get_mut(&key) {
            Some(mut lead) => {
                lead.status = LeadStatus::Completed;
                tracing::info!(campaign = %campaign_id, lead = %lead.id, "lead completed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_for_campaign(&self, campaign_id: &CampaignId) -> Result<Vec<Lead>> {
        let mut leads: Vec<Lead> = self
            .leads
            .iter()
            .filter(|entry| entry.key().0 == *campaign_id)
            .map(|entry| entry.value().clone())
            .collect();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(leads)
    }
}
