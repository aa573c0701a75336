//! Email sender implementations.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::EmailError;
use crate::message::OutboundEmail;

/// Dispatches a composed email through some provider.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError>;
}

/// Resend-style transactional email client (`POST {base}/emails` with a
/// bearer API key).
pub struct ResendSender {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ResendSender {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://api.resend.com")
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl EmailSender for ResendSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        let body = serde_json::json!({
            "from": email.from,
            "to": [email.to],
            "subject": email.subject,
            "html": email.html,
        });

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %message, "email provider rejected send");
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(to = %email.to, subject = %email.subject, "email dispatched");
        Ok(())
    }
}

/// Sender used when no provider API key is configured. Always fails, which
/// the API surfaces as a server configuration error.
pub struct DisabledSender;

#[async_trait]
impl EmailSender for DisabledSender {
    async fn send(&self, _email: &OutboundEmail) -> Result<(), EmailError> {
        Err(EmailError::NotConfigured(
            "no email provider API key set".to_string(),
        ))
    }
}

/// Test double that records every send and can be toggled to fail.
pub struct RecordingSender {
    sent: Mutex<Vec<OutboundEmail>>,
    failing: AtomicBool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make subsequent sends fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Everything sent so far.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("sender mutex poisoned").clone()
    }
}

impl Default for RecordingSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmailError::Rejected {
                status: 500,
                message: "simulated send failure".to_string(),
            });
        }
        self.sent
            .lock()
            .expect("sender mutex poisoned")
            .push(email.clone());
        Ok(())
    }
}
