//! Closed dispatch from task kinds to verification adapters.

use linkgate_types::TaskKind;
use std::collections::HashMap;
use std::sync::Arc;

use crate::adapters::{SoftSessionVerifier, SubscriptionVerifier, TaskVerifier};
use crate::providers::{HttpIdentityApi, HttpSubscriptionApi};

/// Maps each non-email task kind to its adapter.
///
/// The email kind is intentionally absent: it runs through the one-time
/// code flow, not a token verification.
pub struct VerifierRegistry {
    verifiers: HashMap<TaskKind, Arc<dyn TaskVerifier>>,
}

impl VerifierRegistry {
    pub fn new() -> Self {
        Self {
            verifiers: HashMap::new(),
        }
    }

    /// Registry wired to the real provider APIs: soft checks for X and
    /// LinkedIn kinds, strict subscription check for YouTube.
    pub fn with_http_providers() -> Self {
        let x: Arc<dyn crate::providers::IdentityApi> = Arc::new(HttpIdentityApi::x());
        let linkedin: Arc<dyn crate::providers::IdentityApi> = Arc::new(HttpIdentityApi::linkedin());
        let youtube: Arc<dyn crate::providers::SubscriptionApi> =
            Arc::new(HttpSubscriptionApi::youtube());

        let mut registry = Self::new();
        for kind in [TaskKind::XFollow, TaskKind::XRepost, TaskKind::XLike] {
            registry.insert(
                kind,
                Arc::new(SoftSessionVerifier::new(x.clone(), kind)),
            );
        }
        registry.insert(
            TaskKind::LinkedinShare,
            Arc::new(SoftSessionVerifier::new(
                linkedin,
                TaskKind::LinkedinShare,
            )),
        );
        registry.insert(
            TaskKind::YtSubscribe,
            Arc::new(SubscriptionVerifier::new(youtube)),
        );
        registry
    }

    /// Register (or replace) the adapter for a kind. Replacing is how a
    /// deployment upgrades a soft check to a strict one.
    pub fn insert(&mut self, kind: TaskKind, verifier: Arc<dyn TaskVerifier>) {
        self.verifiers.insert(kind, verifier);
    }

    pub fn get(&self, kind: TaskKind) -> Option<Arc<dyn TaskVerifier>> {
        self.verifiers.get(&kind).cloned()
    }
}

impl Default for VerifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}
