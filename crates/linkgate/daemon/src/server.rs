//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use linkgate_billing::{BillingProvider, DisabledBilling, StripeBilling};
use linkgate_codes::CodeService;
use linkgate_email::{DisabledSender, EmailSender, ResendSender, RewardDelivery};
use linkgate_store::{InMemoryCampaignStore, InMemoryLeadStore};
use linkgate_verify::VerifierRegistry;
use std::sync::Arc;
use tokio::net::TcpListener;

/// LinkGate daemon server
pub struct Server {
    config: DaemonConfig,
    state: AppState,
}

impl Server {
    /// Wire up stores, providers, and services from the configuration.
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let campaigns = Arc::new(InMemoryCampaignStore::new());
        let leads = Arc::new(InMemoryLeadStore::new());

        let sender: Arc<dyn EmailSender> = match &config.email.api_key {
            Some(key) => Arc::new(ResendSender::new(key.clone())),
            None => {
                tracing::warn!("no email API key configured, email sends will fail");
                Arc::new(DisabledSender)
            }
        };

        let billing: Arc<dyn BillingProvider> = match &config.billing.secret_key {
            Some(key) => Arc::new(StripeBilling::new(
                key.clone(),
                config.billing.price_id.clone(),
                config.billing.app_url.clone(),
            )),
            None => {
                tracing::warn!("no billing secret configured, checkout requests will fail");
                Arc::new(DisabledBilling)
            }
        };

        let codes = Arc::new(CodeService::new(
            leads.clone(),
            sender.clone(),
            config.email.from.clone(),
        ));
        let rewards = Arc::new(RewardDelivery::new(
            sender.clone(),
            config.email.from.clone(),
        ));
        let verifiers = Arc::new(VerifierRegistry::with_http_providers());

        let state = AppState::new(campaigns, leads, codes, verifiers, rewards, billing);

        Ok(Self { config, state })
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;
        let app = create_router(self.state, self.config.server.enable_cors);

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("linkgated listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("linkgated shutting down");
        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
