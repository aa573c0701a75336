//! Task verification adapters.
//!
//! Each non-email task kind dispatches to a [`TaskVerifier`]. Social tasks
//! (X follow/repost/like, LinkedIn share) are *soft* checks: a currently
//! authorized session counts as completion, because the upstream APIs do
//! not expose a cheap "did X do Y" query at the assumed trust tier. The
//! YouTube subscribe task is a *strict* check against the provider's
//! subscription listing. The [`Capability`] marker is the seam for turning
//! soft checks strict per deployment without touching callers.

mod adapters;
mod error;
mod outcome;
mod providers;
mod registry;

pub use adapters::{SoftSessionVerifier, SubscriptionVerifier, TaskVerifier};
pub use error::VerifyError;
pub use outcome::{Capability, Verdict};
pub use providers::{
    AuthCheck, HttpIdentityApi, HttpSubscriptionApi, IdentityApi, SubscriptionApi,
    SubscriptionCheck, LINKEDIN_API_BASE, X_API_BASE, YOUTUBE_API_BASE,
};
pub use registry::VerifierRegistry;
