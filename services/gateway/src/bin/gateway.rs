//! services/gateway/src/bin/gateway.rs

use gateway_lib::{
    adapters::{BridgeMessengerAdapter, HttpCatalogAdapter, HttpOrderAdapter},
    config::Config,
    error::GatewayError,
    web::{self, AppState},
};
use grabtext_core::{DialogEngine, SessionStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), GatewayError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting gateway...");

    // --- 2. Initialize the HTTP Client & Port Adapters ---
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|e| GatewayError::Internal(format!("failed to build HTTP client: {e}")))?;

    let catalog = Arc::new(HttpCatalogAdapter::new(
        http.clone(),
        &config.backend_url,
        &config.catalog_web_url,
    ));
    let orders = Arc::new(HttpOrderAdapter::new(http.clone(), &config.backend_url));
    let messenger = Arc::new(BridgeMessengerAdapter::new(http, &config.bridge_url));

    // --- 3. Build the Session Store & Dialog Engine ---
    let store = Arc::new(SessionStore::new());
    let engine = Arc::new(DialogEngine::new(store.clone(), catalog, orders, messenger));

    // --- 4. Start the Idle-Session Eviction Sweep ---
    {
        let store = store.clone();
        let max_idle = config.session_idle;
        let mut interval = tokio::time::interval(config.eviction_interval);
        tokio::spawn(async move {
            loop {
                interval.tick().await;
                let evicted = store.evict_idle(max_idle).await;
                if evicted > 0 {
                    let live = store.len().await;
                    info!(evicted, live, "evicted idle sessions");
                }
            }
        });
    }

    // --- 5. Create the Web Router & Start the Server ---
    let app = web::router(AppState {
        engine,
        config: config.clone(),
    });

    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
