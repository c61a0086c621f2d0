//! services/gateway/src/error.rs
//!
//! Defines the primary error type for the entire gateway service.

use crate::config::ConfigError;

/// The primary error type for the `gateway` service.
///
/// Port failures never reach this type: the handlers translate them into
/// response envelopes and the dialog engine logs them.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
