//! Content server: stores site values and relays changes to subscribers.
//!
//! # Endpoints
//!
//! - `GET /health`: Health check endpoint (no auth required)
//! - `GET /ws`: WebSocket speaking the store protocol. Reads are public,
//!   writes carry an API key.

pub mod auth;
pub mod hub;
pub mod socket;
pub mod storage;

pub use auth::{generate_key, ApiKeyEntry, ApiKeyStore, KeyFile, KeyFileError};
pub use hub::{SnapshotHub, Update};
pub use storage::{ServerStorage, ServerStorageError};

use axum::{routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;
use sitecms_core::StorePath;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    storage: Arc<RwLock<ServerStorage>>,
    hub: Arc<SnapshotHub>,
    api_keys: Arc<ApiKeyStore>,
}

impl AppState {
    pub fn new(storage: ServerStorage, api_keys: ApiKeyStore) -> Self {
        Self {
            storage: Arc::new(RwLock::new(storage)),
            hub: Arc::new(SnapshotHub::new()),
            api_keys: Arc::new(api_keys),
        }
    }

    /// Current value at `path`.
    pub async fn load(&self, path: &StorePath) -> Result<Option<Value>, ServerStorageError> {
        self.storage.read().await.load(path)
    }

    /// Persists `value` and notifies subscribers. Broadcasting under the
    /// write lock keeps notifications in save order.
    pub async fn write(&self, path: &StorePath, value: Value) -> Result<(), ServerStorageError> {
        let storage = self.storage.write().await;
        storage.save(path, &value)?;
        let value = (!value.is_null()).then_some(value);
        self.hub
            .broadcast(Update {
                path: path.clone(),
                value,
            })
            .await;
        Ok(())
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint (no auth required)
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws", get(socket::ws_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
