//! Email channel errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmailError {
    /// Transport-level failure reaching the provider.
    #[error("Email transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider rejected the send.
    #[error("Email provider rejected send ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The sender is not configured for this deployment.
    #[error("Email sender not configured: {0}")]
    NotConfigured(String),

    /// Reward delivery requires a recipient but none is known.
    #[error("No recipient email for reward delivery")]
    MissingRecipient,
}
