//! Provider API seams and their HTTP implementations.
//!
//! Adapters talk to providers through these traits so tests can substitute
//! canned identities and subscription listings.

use async_trait::async_trait;

use crate::error::VerifyError;

pub const X_API_BASE: &str = "https://api.twitter.com";
pub const LINKEDIN_API_BASE: &str = "https://api.linkedin.com";
pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com";

/// Result of asking a provider "who does this token belong to".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthCheck {
    Authorized,
    Unauthorized,
}

/// Result of a subscription lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionCheck {
    Subscribed,
    NotSubscribed,
    Unauthorized,
}

/// Confirms an access token maps to an authorized identity.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn current_user(&self, access_token: &str) -> Result<AuthCheck, VerifyError>;
}

/// Looks up whether the token's identity is subscribed to a channel.
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    async fn find_subscription(
        &self,
        access_token: &str,
        channel_id: &str,
    ) -> Result<SubscriptionCheck, VerifyError>;
}

/// Identity check against a bearer-auth "me" endpoint (X's `/2/users/me`,
/// LinkedIn's `/v2/me`).
pub struct HttpIdentityApi {
    client: reqwest::Client,
    me_url: String,
}

impl HttpIdentityApi {
    pub fn x() -> Self {
        Self::new(format!("{}/2/users/me", X_API_BASE))
    }

    pub fn linkedin() -> Self {
        Self::new(format!("{}/v2/me", LINKEDIN_API_BASE))
    }

    pub fn new(me_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            me_url: me_url.into(),
        }
    }
}

#[async_trait]
impl IdentityApi for HttpIdentityApi {
    async fn current_user(&self, access_token: &str) -> Result<AuthCheck, VerifyError> {
        let response = self
            .client
            .get(&self.me_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(AuthCheck::Authorized);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(AuthCheck::Unauthorized);
        }

        let message = response.text().await.unwrap_or_default();
        Err(VerifyError::Provider {
            status: status.as_u16(),
            message,
        })
    }
}

/// YouTube Data API v3 subscription lookup
/// (`GET /youtube/v3/subscriptions?part=snippet&mine=true&forChannelId=`).
pub struct HttpSubscriptionApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSubscriptionApi {
    pub fn youtube() -> Self {
        Self::new(YOUTUBE_API_BASE)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SubscriptionApi for HttpSubscriptionApi {
    async fn find_subscription(
        &self,
        access_token: &str,
        channel_id: &str,
    ) -> Result<SubscriptionCheck, VerifyError> {
        let url = format!(
            "{}/youtube/v3/subscriptions?part=snippet&mine=true&forChannelId={}",
            self.base_url, channel_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(SubscriptionCheck::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %message, "subscription lookup failed");
            return Err(VerifyError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response.json().await?;
        let subscribed = body
            .get("items")
            .and_then(|items| items.as_array())
            .map(|items| !items.is_empty())
            .unwrap_or(false);

        Ok(if subscribed {
            SubscriptionCheck::Subscribed
        } else {
            SubscriptionCheck::NotSubscribed
        })
    }
}
