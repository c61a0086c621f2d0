//! services/gateway/src/web/inbound.rs
//!
//! The webhook the channel bridge posts inbound message events to. One
//! request runs one dialog turn; per-sender ordering is the engine's
//! concern, so concurrent requests are handed straight through.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use tracing::debug;

use crate::web::protocol::{required, ApiResponse, InboundMessage};
use crate::web::state::AppState;

pub async fn webhook_handler(
    State(state): State<AppState>,
    Json(event): Json<InboundMessage>,
) -> (StatusCode, Json<ApiResponse>) {
    let sender_id = match required(event.sender_id, "senderId") {
        Ok(v) => v,
        Err(rejection) => return rejection,
    };
    // The body may legitimately be empty, but the field must be present.
    let Some(body) = event.body else {
        return ApiResponse::failure(StatusCode::BAD_REQUEST, "body is required");
    };

    debug!(sender_id, "inbound message received");
    state.engine.handle_message(&sender_id, &body).await;
    ApiResponse::ok()
}
