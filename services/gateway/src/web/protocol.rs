//! services/gateway/src/web/protocol.rs
//!
//! The JSON envelope shared by every endpoint, and the request payloads.
//! All wire fields are camelCase. Identifying fields are deserialized as
//! `Option` so a missing field produces a 400 with `{success:false}`
//! instead of a framework rejection body.

use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

/// The uniform `{success, error?}` response of the gateway's endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok() -> (StatusCode, Json<ApiResponse>) {
        (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                error: None,
            }),
        )
    }

    pub fn failure(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<ApiResponse>) {
        (
            status,
            Json(ApiResponse {
                success: false,
                error: Some(error.into()),
            }),
        )
    }
}

/// An inbound message event from the channel bridge.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub sender_id: Option<String>,
    pub body: Option<String>,
}

/// Out-of-band notification that a submitted order was paid.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    pub sender_id: Option<String>,
    pub order_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddonPayload {
    pub name: String,
    pub price: u64,
}

/// Hand-back from an external catalog checkout: seeds the sender's session
/// for address collection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectAddressRequest {
    pub sender_id: Option<String>,
    pub order_reference: Option<String>,
    pub item: Option<String>,
    pub quantity: Option<u32>,
    pub unit_price: Option<u64>,
    #[serde(default)]
    pub addons: Vec<AddonPayload>,
}

/// Extracts a required, non-empty identifying field.
pub fn required(field: Option<String>, name: &str) -> Result<String, (StatusCode, Json<ApiResponse>)> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiResponse::failure(
            StatusCode::BAD_REQUEST,
            format!("{name} is required"),
        )),
    }
}
