//! services/gateway/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Base URL of the commerce backend (catalog + order creation).
    pub backend_url: String,
    /// Base URL of the channel bridge that delivers outbound messages.
    pub bridge_url: String,
    /// Base URL of the browsable web catalog, embedded in option-2 links.
    pub catalog_web_url: String,
    pub log_level: Level,
    /// Applied to every catalog fetch and order submission; expiry is a
    /// submission failure, never an unbounded wait.
    pub http_timeout: Duration,
    /// Sessions idle longer than this are evicted by the background sweep.
    pub session_idle: Duration,
    pub eviction_interval: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Collaborator Endpoints ---
        let backend_url = std::env::var("BACKEND_URL")
            .map_err(|_| ConfigError::MissingVar("BACKEND_URL".to_string()))?;
        let bridge_url = std::env::var("BRIDGE_URL")
            .map_err(|_| ConfigError::MissingVar("BRIDGE_URL".to_string()))?;
        let catalog_web_url = std::env::var("CATALOG_WEB_URL")
            .unwrap_or_else(|_| format!("{}/menu", backend_url.trim_end_matches('/')));

        // --- Load Timing Settings ---
        let http_timeout = parse_secs("HTTP_TIMEOUT_SECS", 15)?;
        let session_idle = parse_secs("SESSION_IDLE_SECS", 24 * 60 * 60)?;
        let eviction_interval = parse_secs("EVICTION_INTERVAL_SECS", 600)?;

        Ok(Self {
            bind_address,
            backend_url,
            bridge_url,
            catalog_web_url,
            log_level,
            http_timeout,
            session_idle,
            eviction_interval,
        })
    }
}

fn parse_secs(var: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(Duration::from_secs(default_secs)),
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidValue(var.to_string(), e.to_string())),
    }
}
