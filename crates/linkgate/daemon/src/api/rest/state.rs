//! Application state for API handlers

use linkgate_billing::BillingProvider;
use linkgate_codes::CodeService;
use linkgate_email::RewardDelivery;
use linkgate_store::{CampaignStore, LeadStore};
use linkgate_verify::VerifierRegistry;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Campaign storage
    pub campaigns: Arc<dyn CampaignStore>,

    /// Lead storage
    pub leads: Arc<dyn LeadStore>,

    /// One-time-code service
    pub codes: Arc<CodeService>,

    /// Task verification adapters
    pub verifiers: Arc<VerifierRegistry>,

    /// Reward delivery
    pub rewards: Arc<RewardDelivery>,

    /// Billing provider
    pub billing: Arc<dyn BillingProvider>,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        campaigns: Arc<dyn CampaignStore>,
        leads: Arc<dyn LeadStore>,
        codes: Arc<CodeService>,
        verifiers: Arc<VerifierRegistry>,
        rewards: Arc<RewardDelivery>,
        billing: Arc<dyn BillingProvider>,
    ) -> Self {
        Self {
            campaigns,
            leads,
            codes,
            verifiers,
            rewards,
            billing,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }
}
