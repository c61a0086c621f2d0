pub mod inbound;
pub mod payments;
pub mod protocol;
pub mod state;

use axum::routing::{get, post};
use axum::Router;

pub use inbound::webhook_handler;
pub use payments::{collect_address_handler, confirm_payment_handler};
pub use state::AppState;

/// Liveness indicator for process supervision.
async fn liveness_handler() -> &'static str {
    "running"
}

/// Builds the gateway's complete route table over the shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness_handler))
        .route("/webhook", post(webhook_handler))
        .route("/payments/confirm", post(confirm_payment_handler))
        .route("/payments/collect-address", post(collect_address_handler))
        .with_state(state)
}
