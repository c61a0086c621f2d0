//! Contract tests for the gateway's HTTP surface, driving the axum router
//! in-process with fakes behind the dialog engine.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use gateway_lib::config::Config;
use gateway_lib::web::{self, AppState};
use grabtext_core::{
    Catalog, CatalogItem, DialogEngine, MenuCatalogService, Order, OrderSubmissionService,
    OutboundMessenger, PortError, PortResult, SessionStore, Stage, SubmittedOrder,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing::Level;

//=========================================================================================
// Fakes
//=========================================================================================

struct FakeCatalog {
    catalogs: HashMap<String, Catalog>,
}

#[async_trait]
impl MenuCatalogService for FakeCatalog {
    async fn fetch_menu(&self, code: &str) -> PortResult<Catalog> {
        self.catalogs
            .get(code)
            .cloned()
            .ok_or_else(|| PortError::NotFound(code.to_string()))
    }

    fn catalog_url(&self, sender_id: &str, code: &str) -> String {
        format!("https://menu.example/{code}?sender={sender_id}")
    }
}

struct FakeOrders;

#[async_trait]
impl OrderSubmissionService for FakeOrders {
    async fn submit(&self, _order: &Order) -> PortResult<SubmittedOrder> {
        Ok(SubmittedOrder {
            order_url: "https://pay.example/abc123".into(),
        })
    }
}

#[derive(Default)]
struct FakeOutbound {
    fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl OutboundMessenger for FakeOutbound {
    async fn send(&self, sender_id: &str, text: &str) -> PortResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((sender_id.to_string(), text.to_string()));
        if self.fail {
            Err(PortError::Transport("bridge unreachable".into()))
        } else {
            Ok(())
        }
    }
}

//=========================================================================================
// Harness
//=========================================================================================

struct Harness {
    router: Router,
    store: Arc<SessionStore>,
    outbound: Arc<FakeOutbound>,
}

fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
        backend_url: "http://backend.test".into(),
        bridge_url: "http://bridge.test".into(),
        catalog_web_url: "https://menu.example".into(),
        log_level: Level::INFO,
        http_timeout: Duration::from_secs(5),
        session_idle: Duration::from_secs(3600),
        eviction_interval: Duration::from_secs(600),
    }
}

fn build(fail_outbound: bool) -> Harness {
    let store = Arc::new(SessionStore::new());
    let outbound = Arc::new(FakeOutbound {
        fail: fail_outbound,
        sent: Mutex::new(Vec::new()),
    });
    let catalogs = HashMap::from([(
        "kbarb".to_string(),
        Catalog {
            restaurant: "Kofi's Barbecue".to_string(),
            menu: vec![CatalogItem {
                name: "Khebab Platter".to_string(),
                price: 4000,
                addons: Vec::new(),
            }],
        },
    )]);
    let engine = Arc::new(DialogEngine::new(
        store.clone(),
        Arc::new(FakeCatalog { catalogs }),
        Arc::new(FakeOrders),
        outbound.clone(),
    ));
    let router = web::router(AppState {
        engine,
        config: Arc::new(test_config()),
    });
    Harness {
        router,
        store,
        outbound,
    }
}

async fn post_json(router: Router, path: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

//=========================================================================================
// Tests
//=========================================================================================

#[tokio::test]
async fn liveness_reports_running() {
    let h = build(false);
    let response = h
        .router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"running");
}

#[tokio::test]
async fn webhook_runs_a_dialog_turn() {
    let h = build(false);
    let (status, body) = post_json(
        h.router,
        "/webhook",
        json!({"senderId": "233200000001", "body": "hi"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let session = h.store.snapshot("233200000001").await.unwrap();
    assert_eq!(session.stage, Stage::AwaitingRestaurantCode);
    let sent = h.outbound.sent.lock().unwrap();
    assert!(sent[0].1.contains("Welcome to Grab Text"));
}

#[tokio::test]
async fn webhook_rejects_a_missing_sender() {
    let h = build(false);
    let (status, body) = post_json(h.router, "/webhook", json!({"body": "hi"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("senderId"));
    assert!(h.store.is_empty().await, "no session mutation on rejection");
}

#[tokio::test]
async fn webhook_rejects_a_blank_sender() {
    let h = build(false);
    let (status, body) =
        post_json(h.router, "/webhook", json!({"senderId": "  ", "body": "hi"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn confirm_payment_sends_the_reference() {
    let h = build(false);
    let (status, body) = post_json(
        h.router,
        "/payments/confirm",
        json!({"senderId": "233200000001", "orderReference": "GT-1042"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let sent = h.outbound.sent.lock().unwrap();
    assert!(sent[0].1.contains("GT-1042"));
    drop(sent);
    // Confirmation never touches session state.
    assert!(h.store.snapshot("233200000001").await.is_none());
}

#[tokio::test]
async fn confirm_payment_validates_required_fields() {
    let h = build(false);
    let (status, body) = post_json(
        h.router,
        "/payments/confirm",
        json!({"senderId": "233200000001"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("orderReference"));
}

#[tokio::test]
async fn confirm_payment_surfaces_a_send_failure() {
    let h = build(true);
    let (status, body) = post_json(
        h.router,
        "/payments/confirm",
        json!({"senderId": "233200000001", "orderReference": "GT-1042"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn collect_address_seeds_the_session() {
    let h = build(false);
    let (status, body) = post_json(
        h.router,
        "/payments/collect-address",
        json!({
            "senderId": "233200000001",
            "orderReference": "GT-1042",
            "item": "Suya Wrap",
            "quantity": 2,
            "unitPrice": 1500,
            "addons": [{"name": "Pepper", "price": 200}],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let session = h.store.snapshot("233200000001").await.unwrap();
    assert_eq!(session.stage, Stage::AwaitingAddress);
    assert_eq!(session.draft.selected_item.as_deref(), Some("Suya Wrap"));
    assert_eq!(session.draft.quantity, Some(2));
    assert_eq!(session.draft.unit_price, Some(1500));
    assert!(session.draft.idempotency_key.is_some());

    let sent = h.outbound.sent.lock().unwrap();
    assert!(sent[0].1.contains("delivery address"));
    assert!(sent[0].1.contains("GH₵32.00"));
}

#[tokio::test]
async fn collect_address_rejects_an_overflowing_amount() {
    let h = build(false);
    let (status, body) = post_json(
        h.router,
        "/payments/collect-address",
        json!({
            "senderId": "233200000001",
            "orderReference": "GT-1042",
            "item": "Suya Wrap",
            "quantity": 3,
            "unitPrice": u64::MAX / 2,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(h.store.snapshot("233200000001").await.is_none());
    assert!(h.outbound.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn collect_address_validates_quantity() {
    let h = build(false);
    for quantity in [json!(0), Value::Null] {
        let (status, body) = post_json(
            h.router.clone(),
            "/payments/collect-address",
            json!({
                "senderId": "233200000001",
                "orderReference": "GT-1042",
                "item": "Suya Wrap",
                "quantity": quantity,
                "unitPrice": 1500,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert!(h.store.snapshot("233200000001").await.is_none());
    }
}
