//! LinkGate daemon - the gate service
//!
//! The daemon provides:
//! - REST API for campaign publishing and dashboard listing
//! - Email one-time-code issue/check for the email task
//! - Social/subscription verification endpoints
//! - Reward delivery (reveal and/or email) and lead CSV export

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod server;

use config::DaemonConfig;
use error::DaemonResult;
use server::Server;

/// LinkGate Daemon CLI
#[derive(Parser)]
#[command(name = "linkgated")]
#[command(about = "LinkGate daemon - link-in-bio gate service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LINKGATE_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(
        short,
        long,
        env = "LINKGATE_LISTEN_ADDR",
        default_value = "127.0.0.1:8080"
    )]
    listen: String,

    /// Log level
    #[arg(long, env = "LINKGATE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "LINKGATE_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| error::DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    config.server.listen_addr = cli
        .listen
        .parse()
        .map_err(|e| error::DaemonError::Config(format!("Invalid listen address: {}", e)))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.server.listen_addr,
        email_configured = config.email.api_key.is_some(),
        billing_configured = config.billing.secret_key.is_some(),
        "starting linkgated"
    );

    // Create and run server
    let server = Server::new(config)?;
    server.run().await
}
