//! Verification errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    /// The task definition is missing config the adapter needs.
    #[error("Missing task configuration: {0}")]
    MissingConfig(&'static str),

    /// The upstream provider call failed for reasons other than
    /// authorization. Not attributable to the visitor; retryable.
    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// Transport-level failure reaching the provider.
    #[error("Provider transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
