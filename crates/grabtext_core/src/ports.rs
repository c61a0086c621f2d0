//! crates/grabtext_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the dialog engine's
//! collaborators. These traits form the boundary of the hexagonal
//! architecture, allowing the core to be independent of the concrete
//! backend and messaging channel.

use async_trait::async_trait;

use crate::domain::{Catalog, Order};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services
/// (commerce backend, channel bridge).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The backend does not know the requested resource (e.g. an unknown
    /// restaurant code).
    #[error("Not found: {0}")]
    NotFound(String),
    /// The backend answered, but refused the operation (`success:false`).
    #[error("Rejected by backend: {0}")]
    Rejected(String),
    /// A network-level failure or timeout before a usable answer arrived.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The menu catalog provider: resolves a restaurant code to a menu.
#[async_trait]
pub trait MenuCatalogService: Send + Sync {
    /// Fetches the menu for a restaurant code. An unknown code is
    /// `NotFound`; an empty menu is returned as-is and treated as a
    /// business failure by the caller.
    async fn fetch_menu(&self, code: &str) -> PortResult<Catalog>;

    /// The web catalog address for a sender, used when the sender prefers
    /// browsing over the inline menu.
    fn catalog_url(&self, sender_id: &str, code: &str) -> String;
}

/// The result of a successful order submission.
#[derive(Debug, Clone)]
pub struct SubmittedOrder {
    /// Payment link, relayed verbatim to the sender.
    pub order_url: String,
}

/// The commerce backend's order-creation endpoint.
#[async_trait]
pub trait OrderSubmissionService: Send + Sync {
    async fn submit(&self, order: &Order) -> PortResult<SubmittedOrder>;
}

/// The messaging channel, outbound direction.
#[async_trait]
pub trait OutboundMessenger: Send + Sync {
    /// Delivers one text message to a sender. The dialog engine logs
    /// failures and keeps going; delivery is not load-bearing for the
    /// state machine's forward progress.
    async fn send(&self, sender_id: &str, text: &str) -> PortResult<()>;
}
