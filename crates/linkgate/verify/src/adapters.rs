//! Verifier implementations over the provider seams.

use async_trait::async_trait;
use linkgate_types::{TaskConfig, TaskKind};
use std::sync::Arc;

use crate::error::VerifyError;
use crate::outcome::{Capability, Verdict};
use crate::providers::{AuthCheck, IdentityApi, SubscriptionApi, SubscriptionCheck};

/// A capability-bearing verification adapter for one task kind.
#[async_trait]
pub trait TaskVerifier: Send + Sync {
    fn capability(&self) -> Capability;

    async fn verify(
        &self,
        access_token: &str,
        config: &TaskConfig,
    ) -> Result<Verdict, VerifyError>;
}

/// Soft/intent verifier: a valid authorized session is accepted as proof of
/// the configured action. The target in the config is logged but not
/// cross-referenced against the provider.
pub struct SoftSessionVerifier {
    api: Arc<dyn IdentityApi>,
    kind: TaskKind,
}

impl SoftSessionVerifier {
    pub fn new(api: Arc<dyn IdentityApi>, kind: TaskKind) -> Self {
        Self { api, kind }
    }
}

#[async_trait]
impl TaskVerifier for SoftSessionVerifier {
    fn capability(&self) -> Capability {
        Capability::Soft
    }

    async fn verify(
        &self,
        access_token: &str,
        config: &TaskConfig,
    ) -> Result<Verdict, VerifyError> {
        match self.api.current_user(access_token).await? {
            AuthCheck::Authorized => {
                tracing::info!(
                    kind = ?self.kind,
                    target = config.username.as_deref().or(config.url.as_deref()),
                    "soft verification accepted authorized session"
                );
                Ok(Verdict::Verified)
            }
            AuthCheck::Unauthorized => Ok(Verdict::Unauthorized),
        }
    }
}

/// Strict verifier for channel subscriptions: verified only when the
/// provider reports at least one matching subscription.
pub struct SubscriptionVerifier {
    api: Arc<dyn SubscriptionApi>,
}

impl SubscriptionVerifier {
    pub fn new(api: Arc<dyn SubscriptionApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl TaskVerifier for SubscriptionVerifier {
    fn capability(&self) -> Capability {
        Capability::Strict
    }

    async fn verify(
        &self,
        access_token: &str,
        config: &TaskConfig,
    ) -> Result<Verdict, VerifyError> {
        let channel_id = config
            .channel_id
            .as_deref()
            .ok_or(VerifyError::MissingConfig("channel_id"))?;

        match self.api.find_subscription(access_token, channel_id).await? {
            SubscriptionCheck::Subscribed => Ok(Verdict::Verified),
            SubscriptionCheck::NotSubscribed => Ok(Verdict::NotSubscribed),
            SubscriptionCheck::Unauthorized => Ok(Verdict::Unauthorized),
        }
    }
}
