//! Hosted-checkout billing integration.
//!
//! Creators upgrade through a hosted checkout page; this crate only knows
//! how to get-or-create the provider customer and mint a checkout session
//! URL. Subscription lifecycle (webhooks, entitlements) is the provider's
//! concern and out of scope.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Billing provider not configured: {0}")]
    NotConfigured(String),

    #[error("Billing provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Billing transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Checkout provider seam.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Get or create the provider customer for a creator account.
    async fn ensure_customer(&self, user_id: &str, email: &str) -> Result<String, BillingError>;

    /// Create a hosted checkout session and return its URL.
    async fn create_checkout_session(
        &self,
        customer_id: &str,
        user_id: &str,
    ) -> Result<String, BillingError>;
}

/// Stripe-style form-encoded checkout client.
///
/// Customer IDs are cached per user so `ensure_customer` creates a provider
/// customer at most once per process lifetime.
pub struct StripeBilling {
    client: reqwest::Client,
    secret_key: String,
    price_id: String,
    app_url: String,
    base_url: String,
    customers: DashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct CustomerResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    url: Option<String>,
}

impl StripeBilling {
    pub fn new(
        secret_key: impl Into<String>,
        price_id: impl Into<String>,
        app_url: impl Into<String>,
    ) -> Self {
        Self::with_base_url(secret_key, price_id, app_url, "https://api.stripe.com")
    }

    pub fn with_base_url(
        secret_key: impl Into<String>,
        price_id: impl Into<String>,
        app_url: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: secret_key.into(),
            price_id: price_id.into(),
            app_url: app_url.into(),
            base_url: base_url.into(),
            customers: DashMap::new(),
        }
    }

    async fn post_form<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<T, BillingError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %message, "billing provider call failed");
            return Err(BillingError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl BillingProvider for StripeBilling {
    async fn ensure_customer(&self, user_id: &str, email: &str) -> Result<String, BillingError> {
        if let Some(existing) = self.customers.get(user_id) {
            return Ok(existing.clone());
        }

        let form = vec![
            ("email".to_string(), email.to_string()),
            ("metadata[user_id]".to_string(), user_id.to_string()),
        ];
        let customer: CustomerResponse = self.post_form("/v1/customers", &form).await?;

        self.customers
            .insert(user_id.to_string(), customer.id.clone());
        Ok(customer.id)
    }

    async fn create_checkout_session(
        &self,
        customer_id: &str,
        user_id: &str,
    ) -> Result<String, BillingError> {
        let form = vec![
            ("customer".to_string(), customer_id.to_string()),
            ("mode".to_string(), "subscription".to_string()),
            ("line_items[0][price]".to_string(), self.price_id.clone()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            (
                "success_url".to_string(),
                format!("{}/dashboard?success=true", self.app_url),
            ),
            (
                "cancel_url".to_string(),
                format!("{}/dashboard?canceled=true", self.app_url),
            ),
            ("metadata[user_id]".to_string(), user_id.to_string()),
        ];
        let session: CheckoutSessionResponse =
            self.post_form("/v1/checkout/sessions", &form).await?;

        session.url.ok_or_else(|| {
            BillingError::MalformedResponse("checkout session has no URL".to_string())
        })
    }
}

/// Provider used when no billing secret is configured. Always fails.
pub struct DisabledBilling;

#[async_trait]
impl BillingProvider for DisabledBilling {
    async fn ensure_customer(&self, _user_id: &str, _email: &str) -> Result<String, BillingError> {
        Err(BillingError::NotConfigured(
            "no billing secret key set".to_string(),
        ))
    }

    async fn create_checkout_session(
        &self,
        _customer_id: &str,
        _user_id: &str,
    ) -> Result<String, BillingError> {
        Err(BillingError::NotConfigured(
            "no billing secret key set".to_string(),
        ))
    }
}
