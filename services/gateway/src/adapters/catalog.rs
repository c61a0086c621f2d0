//! services/gateway/src/adapters/catalog.rs
//!
//! This module contains the adapter for the commerce backend's menu
//! catalog. It implements the `MenuCatalogService` port from the `core`
//! crate over plain HTTP.

use async_trait::async_trait;
use grabtext_core::{Addon, Catalog, CatalogItem, MenuCatalogService, PortError, PortResult};
use reqwest::StatusCode;
use serde::Deserialize;

use super::transport_error;

//=========================================================================================
// Wire Payloads
//=========================================================================================

#[derive(Deserialize)]
struct CatalogResponse {
    restaurant: String,
    /// A missing menu deserializes as empty; the dialog engine treats an
    /// empty menu as a business failure.
    #[serde(default)]
    menu: Vec<MenuItemPayload>,
}

#[derive(Deserialize)]
struct MenuItemPayload {
    name: String,
    price: u64,
    #[serde(default)]
    addons: Vec<AddonPayload>,
}

#[derive(Deserialize)]
struct AddonPayload {
    name: String,
    price: u64,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that resolves restaurant codes against the commerce backend.
#[derive(Clone)]
pub struct HttpCatalogAdapter {
    http: reqwest::Client,
    backend_url: String,
    web_url: String,
}

impl HttpCatalogAdapter {
    /// Creates a new `HttpCatalogAdapter`. The client is expected to carry
    /// the configured request timeout.
    pub fn new(http: reqwest::Client, backend_url: &str, web_url: &str) -> Self {
        Self {
            http,
            backend_url: backend_url.trim_end_matches('/').to_string(),
            web_url: web_url.trim_end_matches('/').to_string(),
        }
    }
}

//=========================================================================================
// `MenuCatalogService` Trait Implementation
//=========================================================================================

#[async_trait]
impl MenuCatalogService for HttpCatalogAdapter {
    async fn fetch_menu(&self, code: &str) -> PortResult<Catalog> {
        let url = format!("{}/catalog/{}", self.backend_url, code);
        let response = self.http.get(&url).send().await.map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(PortError::NotFound(format!("restaurant code '{code}'")));
        }
        if !response.status().is_success() {
            return Err(PortError::Rejected(format!(
                "catalog fetch returned {}",
                response.status()
            )));
        }

        let payload: CatalogResponse = response.json().await.map_err(transport_error)?;
        Ok(Catalog {
            restaurant: payload.restaurant,
            menu: payload
                .menu
                .into_iter()
                .map(|item| CatalogItem {
                    name: item.name,
                    price: item.price,
                    addons: item
                        .addons
                        .into_iter()
                        .map(|a| Addon {
                            name: a.name,
                            price: a.price,
                        })
                        .collect(),
                })
                .collect(),
        })
    }

    fn catalog_url(&self, sender_id: &str, code: &str) -> String {
        format!("{}/{}?sender={}", self.web_url, code, sender_id)
    }
}
