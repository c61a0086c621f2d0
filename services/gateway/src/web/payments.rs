//! services/gateway/src/web/payments.rs
//!
//! Endpoints for the out-of-band payment flow. Both are keyed by sender
//! identity, not by session stage: they may arrive while the sender is
//! mid-dialog or idle.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use grabtext_core::{order_amount, Addon, ResumeOrder};
use tracing::error;

use crate::web::protocol::{
    required, ApiResponse, CollectAddressRequest, ConfirmPaymentRequest,
};
use crate::web::state::AppState;

/// Relays a payment confirmation to the sender. Session state is not
/// touched.
pub async fn confirm_payment_handler(
    State(state): State<AppState>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let sender_id = match required(request.sender_id, "senderId") {
        Ok(v) => v,
        Err(rejection) => return rejection,
    };
    let order_reference = match required(request.order_reference, "orderReference") {
        Ok(v) => v,
        Err(rejection) => return rejection,
    };

    match state.engine.confirm_payment(&sender_id, &order_reference).await {
        Ok(()) => ApiResponse::ok(),
        Err(err) => {
            error!(sender_id, error = %err, "failed to deliver payment confirmation");
            ApiResponse::failure(StatusCode::BAD_GATEWAY, "failed to deliver confirmation")
        }
    }
}

/// Seeds (or overwrites) the sender's session for address collection after
/// an external catalog checkout.
pub async fn collect_address_handler(
    State(state): State<AppState>,
    Json(request): Json<CollectAddressRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let sender_id = match required(request.sender_id, "senderId") {
        Ok(v) => v,
        Err(rejection) => return rejection,
    };
    let order_reference = match required(request.order_reference, "orderReference") {
        Ok(v) => v,
        Err(rejection) => return rejection,
    };
    let item = match required(request.item, "item") {
        Ok(v) => v,
        Err(rejection) => return rejection,
    };
    let Some(quantity) = request.quantity.filter(|q| *q > 0) else {
        return ApiResponse::failure(StatusCode::BAD_REQUEST, "quantity must be a positive integer");
    };
    let Some(unit_price) = request.unit_price else {
        return ApiResponse::failure(StatusCode::BAD_REQUEST, "unitPrice is required");
    };
    let addons: Vec<Addon> = request
        .addons
        .into_iter()
        .map(|a| Addon {
            name: a.name,
            price: a.price,
        })
        .collect();
    if order_amount(unit_price, quantity, &addons).is_none() {
        return ApiResponse::failure(
            StatusCode::BAD_REQUEST,
            "amount overflows the supported range",
        );
    }

    let resume = ResumeOrder {
        sender_id: sender_id.clone(),
        order_reference,
        item,
        quantity,
        unit_price,
        addons,
    };

    match state.engine.resume_address(resume).await {
        Ok(()) => ApiResponse::ok(),
        Err(err) => {
            error!(sender_id, error = %err, "failed to deliver address prompt");
            ApiResponse::failure(StatusCode::BAD_GATEWAY, "failed to deliver address prompt")
        }
    }
}
