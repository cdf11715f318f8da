//! Server reachability.

use serde::Deserialize;
use std::time::Duration;

use crate::store::http_url;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// Body of `GET /health` on `sitecms-server`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerHealth {
    pub status: String,
    pub version: String,
}

/// Fetches the server's health report, or `None` when it cannot be reached.
pub async fn server_health(server_url: &str) -> Option<ServerHealth> {
    let client = reqwest::Client::builder()
        .timeout(HEALTH_TIMEOUT)
        .build()
        .ok()?;
    let response = client
        .get(http_url(server_url, "/health"))
        .send()
        .await
        .map_err(|e| tracing::debug!(error = %e, "Health check failed"))
        .ok()?;
    if !response.status().is_success() {
        tracing::debug!(status = %response.status(), "Health check returned error status");
        return None;
    }
    response.json().await.ok()
}

/// Whether the server answers its health check.
pub async fn check_server(server_url: &str) -> bool {
    server_health(server_url)
        .await
        .is_some_and(|health| health.status == "ok")
}
