//! One-time verification codes for email tasks.
//!
//! `issue` writes a pending entry to the lead store and then dispatches the
//! code by email; the store write stays committed even when the send fails,
//! but the failure is surfaced because a never-delivered code is useless to
//! the visitor. `check` delegates the compare-and-mark to the store's
//! atomic consume so a code verifies at most once.

use chrono::{DateTime, Duration, Utc};
use linkgate_email::{verification_code_email, EmailError, EmailSender};
use linkgate_store::{CodeConsumption, LeadStore, StoreError};
use linkgate_types::{CampaignId, TaskId};
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;

/// Codes expire this many minutes after issuance.
pub const CODE_TTL_MINUTES: i64 = 15;

/// A freshly issued code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of checking a submitted code.
///
/// Expiry is deliberately distinct from invalidity: a correct-but-expired
/// code gets a different user-facing message than a wrong one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    /// Code matched; the task is now completed and the code is spent.
    Verified,
    /// A pending code exists but the submitted value does not match.
    Invalid,
    /// The code matched but its expiry has passed; it must be reissued.
    Expired,
    /// No pending code for this task (never issued or already consumed).
    NoPending,
    /// No lead exists for this (campaign, email) pair.
    LeadNotFound,
}

#[derive(Debug, Error)]
pub enum CodeError {
    #[error("Code store error: {0}")]
    Store(#[from] StoreError),

    /// The pending entry was stored but the email could not be dispatched.
    #[error("Code issued but email dispatch failed: {0}")]
    Dispatch(#[from] EmailError),
}

/// Issues and checks one-time codes bound to (campaign, task, email).
pub struct CodeService {
    leads: Arc<dyn LeadStore>,
    sender: Arc<dyn EmailSender>,
    from: String,
}

impl CodeService {
    pub fn new(
        leads: Arc<dyn LeadStore>,
        sender: Arc<dyn EmailSender>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            leads,
            sender,
            from: from.into(),
        }
    }

    /// Uniformly random 6-digit decimal code.
    fn generate_code() -> String {
        rand::thread_rng().gen_range(100_000..=999_999).to_string()
    }

    /// Issue a code for (campaign, task, email), overwriting any previous
    /// pending code for the same triple, and email it to the visitor.
    pub async fn issue(
        &self,
        campaign_id: &CampaignId,
        task_id: &TaskId,
        email: &str,
    ) -> Result<IssuedCode, CodeError> {
        let code = Self::generate_code();
        let expires_at = Utc::now() + Duration::minutes(CODE_TTL_MINUTES);

        self.leads
            .put_pending_code(campaign_id, email, task_id, &code, expires_at)
            .await?;

        tracing::info!(campaign = %campaign_id, task = %task_id, "verification code issued");

        // The pending entry is committed at this point; a send failure is a
        // distinct error path and does not roll it back.
        let message = verification_code_email(&self.from, email, &code);
        self.sender.send(&message).await?;

        Ok(IssuedCode { code, expires_at })
    }

    /// Check a submitted code. On `Verified` the task-progress entry has
    /// already been atomically replaced with the completed marker.
    pub async fn check(
        &self,
        campaign_id: &CampaignId,
        task_id: &TaskId,
        email: &str,
        submitted: &str,
    ) -> Result<CodeCheck, CodeError> {
        let outcome = self
            .leads
            .consume_code(campaign_id, email, task_id, submitted, Utc::now())
            .await?;

        let check = match outcome {
            CodeConsumption::Consumed => CodeCheck::Verified,
            CodeConsumption::Mismatch => CodeCheck::Invalid,
            CodeConsumption::Expired => CodeCheck::Expired,
            CodeConsumption::NoPending => CodeCheck::NoPending,
            CodeConsumption::LeadNotFound => CodeCheck::LeadNotFound,
        };

        tracing::debug!(campaign = %campaign_id, task = %task_id, ?check, "code checked");
        Ok(check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkgate_email::{RecordingSender, DEFAULT_FROM};
    use linkgate_store::InMemoryLeadStore;
    use linkgate_types::TaskProgress;

    fn service() -> (CodeService, Arc<InMemoryLeadStore>, Arc<RecordingSender>) {
        let leads = Arc::new(InMemoryLeadStore::new());
        let sender = Arc::new(RecordingSender::new());
        let service = CodeService::new(leads.clone(), sender.clone(), DEFAULT_FROM);
        (service, leads, sender)
    }

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..1000 {
            let code = CodeService::generate_code();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[tokio::test]
    async fn test_issue_then_check_verifies_once() {
        let (service, _, sender) = service();
        let campaign_id = CampaignId::generate();
        let task_id = TaskId::generate();

        let issued = service
            .issue(&campaign_id, &task_id, "a@b.com")
            .await
            .unwrap();
        assert!(sender.sent()[0].html.contains(&issued.code));

        let first = service
            .check(&campaign_id, &task_id, "a@b.com", &issued.code)
            .await
            .unwrap();
        assert_eq!(first, CodeCheck::Verified);

        // Replay: the code was consumed, never Verified twice.
        let second = service
            .check(&campaign_id, &task_id, "a@b.com", &issued.code)
            .await
            .unwrap();
        assert_eq!(second, CodeCheck::NoPending);
    }

    #[tokio::test]
    async fn test_mismatched_code_is_invalid() {
        let (service, _, _) = service();
        let campaign_id = CampaignId::generate();
        let task_id = TaskId::generate();

        let issued = service
            .issue(&campaign_id, &task_id, "a@b.com")
            .await
            .unwrap();
        let wrong = if issued.code == "123456" {
            "654321"
        } else {
            "123456"
        };

        let outcome = service
            .check(&campaign_id, &task_id, "a@b.com", wrong)
            .await
            .unwrap();
        assert_eq!(outcome, CodeCheck::Invalid);
    }

    #[tokio::test]
    async fn test_reissue_invalidates_previous_code() {
        let (service, _, _) = service();
        let campaign_id = CampaignId::generate();
        let task_id = TaskId::generate();

        let first = service
            .issue(&campaign_id, &task_id, "a@b.com")
            .await
            .unwrap();
        let second = service
            .issue(&campaign_id, &task_id, "a@b.com")
            .await
            .unwrap();

        if first.code != second.code {
            let stale = service
                .check(&campaign_id, &task_id, "a@b.com", &first.code)
                .await
                .unwrap();
            assert_eq!(stale, CodeCheck::Invalid);
        }

        let fresh = service
            .check(&campaign_id, &task_id, "a@b.com", &second.code)
            .await
            .unwrap();
        assert_eq!(fresh, CodeCheck::Verified);
    }

    #[tokio::test]
    async fn test_expired_code_is_distinct() {
        let (service, leads, _) = service();
        let campaign_id = CampaignId::generate();
        let task_id = TaskId::generate();

        // Plant an already-expired pending entry directly in the store.
        leads
            .put_pending_code(
                &campaign_id,
                "a@b.com",
                &task_id,
                "123456",
                Utc::now() - Duration::minutes(1),
            )
            .await
            .unwrap();

        let outcome = service
            .check(&campaign_id, &task_id, "a@b.com", "123456")
            .await
            .unwrap();
        assert_eq!(outcome, CodeCheck::Expired);
    }

    #[tokio::test]
    async fn test_check_without_lead() {
        let (service, _, _) = service();
        let outcome = service
            .check(
                &CampaignId::generate(),
                &TaskId::generate(),
                "nobody@example.com",
                "123456",
            )
            .await
            .unwrap();
        assert_eq!(outcome, CodeCheck::LeadNotFound);
    }

    #[tokio::test]
    async fn test_send_failure_surfaces_but_store_commits() {
        let (service, leads, sender) = service();
        let campaign_id = CampaignId::generate();
        let task_id = TaskId::generate();
        sender.set_failing(true);

        let err = service
            .issue(&campaign_id, &task_id, "a@b.com")
            .await
            .unwrap_err();
        assert!(matches!(err, CodeError::Dispatch(_)));

        // The pending entry survived the failed dispatch.
        let lead = leads.find(&campaign_id, "a@b.com").await.unwrap().unwrap();
        assert!(matches!(
            lead.task_progress.get(&task_id),
            Some(TaskProgress::Pending { .. })
        ));
    }
}
