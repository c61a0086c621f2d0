//! services/gateway/src/adapters/messenger.rs
//!
//! This module contains the adapter for the messaging channel bridge,
//! outbound direction. It implements the `OutboundMessenger` port from
//! the `core` crate by posting to the bridge's send endpoint.

use async_trait::async_trait;
use grabtext_core::{OutboundMessenger, PortError, PortResult};
use serde::Serialize;

use super::transport_error;

/// The bridge's send contract: `{number, message}`.
#[derive(Serialize)]
struct SendMessageRequest<'a> {
    number: &'a str,
    message: &'a str,
}

/// An adapter that delivers outbound texts through the channel bridge.
#[derive(Clone)]
pub struct BridgeMessengerAdapter {
    http: reqwest::Client,
    bridge_url: String,
}

impl BridgeMessengerAdapter {
    pub fn new(http: reqwest::Client, bridge_url: &str) -> Self {
        Self {
            http,
            bridge_url: bridge_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl OutboundMessenger for BridgeMessengerAdapter {
    async fn send(&self, sender_id: &str, text: &str) -> PortResult<()> {
        let url = format!("{}/send-message", self.bridge_url);
        let response = self
            .http
            .post(&url)
            .json(&SendMessageRequest {
                number: sender_id,
                message: text,
            })
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PortError::Rejected(format!(
                "bridge send returned {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn send_payload_matches_the_bridge_contract() {
        let request = SendMessageRequest {
            number: "233200000001",
            message: "hello",
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"number": "233200000001", "message": "hello"})
        );
    }
}
