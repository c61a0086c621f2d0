//! services/gateway/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use grabtext_core::DialogEngine;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. The engine owns the session store and the port adapters; the
/// handlers only ever talk to the engine.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DialogEngine>,
    pub config: Arc<Config>,
}
