//! services/gateway/src/adapters/orders.rs
//!
//! This module contains the adapter for the commerce backend's
//! order-creation endpoint. It implements the `OrderSubmissionService`
//! port from the `core` crate.

use async_trait::async_trait;
use grabtext_core::{Order, OrderSubmissionService, PortError, PortResult, SubmittedOrder};
use serde::{Deserialize, Serialize};

use super::transport_error;

//=========================================================================================
// Wire Payloads
//=========================================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRequest<'a> {
    sender_id: &'a str,
    item: &'a str,
    quantity: u32,
    address: &'a str,
    amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    restaurant_code: Option<&'a str>,
    addons: Vec<AddonPayload<'a>>,
    idempotency_key: &'a str,
}

#[derive(Serialize)]
struct AddonPayload<'a> {
    name: &'a str,
    price: u64,
}

/// `success:false` is a defined failure of the backend, not an exception.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderResponse {
    success: bool,
    order_url: Option<String>,
    error: Option<String>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that submits finalized orders to the commerce backend.
#[derive(Clone)]
pub struct HttpOrderAdapter {
    http: reqwest::Client,
    backend_url: String,
}

impl HttpOrderAdapter {
    pub fn new(http: reqwest::Client, backend_url: &str) -> Self {
        Self {
            http,
            backend_url: backend_url.trim_end_matches('/').to_string(),
        }
    }
}

//=========================================================================================
// `OrderSubmissionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl OrderSubmissionService for HttpOrderAdapter {
    async fn submit(&self, order: &Order) -> PortResult<SubmittedOrder> {
        let request = CreateOrderRequest {
            sender_id: &order.sender_id,
            item: &order.item,
            quantity: order.quantity,
            address: &order.address,
            amount: order.amount,
            restaurant_code: order.restaurant_code.as_deref(),
            addons: order
                .addons
                .iter()
                .map(|a| AddonPayload {
                    name: &a.name,
                    price: a.price,
                })
                .collect(),
            idempotency_key: &order.idempotency_key,
        };

        let url = format!("{}/create-order/", self.backend_url);
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(PortError::Rejected(format!(
                "order creation returned {}",
                response.status()
            )));
        }

        let payload: CreateOrderResponse = response.json().await.map_err(transport_error)?;
        match payload {
            CreateOrderResponse {
                success: true,
                order_url: Some(order_url),
                ..
            } => Ok(SubmittedOrder { order_url }),
            CreateOrderResponse { error, .. } => Err(PortError::Rejected(
                error.unwrap_or_else(|| "backend reported failure".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_payload_uses_camel_case_wire_fields() {
        let request = CreateOrderRequest {
            sender_id: "233200000001",
            item: "Waakye",
            quantity: 2,
            address: "Hostel 3, Room 12",
            amount: 3200,
            restaurant_code: Some("kbarb"),
            addons: vec![AddonPayload {
                name: "Egg",
                price: 200,
            }],
            idempotency_key: "key-1",
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "senderId": "233200000001",
                "item": "Waakye",
                "quantity": 2,
                "address": "Hostel 3, Room 12",
                "amount": 3200,
                "restaurantCode": "kbarb",
                "addons": [{"name": "Egg", "price": 200}],
                "idempotencyKey": "key-1",
            })
        );
    }

    #[test]
    fn restaurant_code_is_omitted_when_absent() {
        let request = CreateOrderRequest {
            sender_id: "s",
            item: "i",
            quantity: 1,
            address: "a",
            amount: 100,
            restaurant_code: None,
            addons: Vec::new(),
            idempotency_key: "k",
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("restaurantCode").is_none());
    }

    #[test]
    fn failure_response_parses_without_order_url() {
        let payload: CreateOrderResponse =
            serde_json::from_str(r#"{"success":false,"error":"out of stock"}"#).unwrap();
        assert!(!payload.success);
        assert_eq!(payload.error.as_deref(), Some("out of stock"));
        assert!(payload.order_url.is_none());
    }
}
