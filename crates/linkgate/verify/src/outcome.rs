//! Verification outcomes and adapter capabilities.

use serde::{Deserialize, Serialize};

/// Result of a verification attempt that reached a decision.
///
/// Provider failures are not verdicts; they surface as
/// [`crate::VerifyError`] and are retryable by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The task counts as completed under the adapter's policy.
    Verified,
    /// The provider rejected the access token; the visitor must
    /// re-authenticate. Never retried server-side.
    Unauthorized,
    /// Strict check only: the required subscription was not found.
    NotSubscribed,
}

/// How much an adapter actually proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Intent check: a valid authorized session is accepted as proof.
    Soft,
    /// The target action is confirmed against the provider.
    Strict,
}
