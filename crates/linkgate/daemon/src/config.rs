//! Configuration for linkgate-daemon

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Email provider configuration
    #[serde(default)]
    pub email: EmailConfig,

    /// Billing provider configuration
    #[serde(default)]
    pub billing: BillingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            email: EmailConfig::default(),
            billing: BillingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".parse().expect("valid default addr"),
            enable_cors: true,
        }
    }
}

/// Email provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Provider API key. Without one, code issuance and email reward
    /// delivery fail with a configuration error.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sender address
    #[serde(default = "default_from_address")]
    pub from: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from: default_from_address(),
        }
    }
}

/// Billing provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Provider secret key. Without one, checkout requests fail with a
    /// configuration error.
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Subscription price identifier
    #[serde(default = "default_price_id")]
    pub price_id: String,

    /// Public app URL used for checkout success/cancel redirects
    #[serde(default = "default_app_url")]
    pub app_url: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            price_id: default_price_id(),
            app_url: default_app_url(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_from_address() -> String {
    linkgate_email::DEFAULT_FROM.to_string()
}

fn default_price_id() -> String {
    "price_linkgate_pro_monthly".to_string()
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from defaults, an optional file, and `LINKGATE_*`
    /// environment variables, in increasing precedence.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("LINKGATE")
                .separator("_")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DaemonConfig::default();
        assert_eq!(config.server.listen_addr.port(), 8080);
        assert!(config.server.enable_cors);
        assert!(config.email.api_key.is_none());
        assert_eq!(config.email.from, linkgate_email::DEFAULT_FROM);
        assert!(config.billing.secret_key.is_none());
    }

    #[test]
    fn test_load_without_file() {
        let config = DaemonConfig::load(None).unwrap();
        assert_eq!(config.logging.level, "info");
    }
}
