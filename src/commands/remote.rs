//! Connecting to the content server.

use sitecms::config::Config;
use sitecms_core::{ContentSynchronizer, RemoteStore, SiteView, SyncOptions, WsStore};
use std::sync::Arc;
use std::time::Duration;

const READY_TIMEOUT: Duration = Duration::from_secs(10);

pub fn server_url(config: &Config) -> Result<&str, Box<dyn std::error::Error>> {
    config.server.server_url.as_deref().ok_or_else(|| {
        "Server not configured. Set server.server_url in the config file or SITECMS_SERVER_URL"
            .into()
    })
}

/// Connects and follows the configured namespace.
pub async fn connect(config: &Config) -> Result<ContentSynchronizer, Box<dyn std::error::Error>> {
    let url = server_url(config)?;
    let store = WsStore::connect(url).await?;
    tracing::debug!(url, "Connected to server");
    let options = SyncOptions::default().with_paths(config.store_paths()?);
    Ok(ContentSynchronizer::start(
        Arc::new(store) as Arc<dyn RemoteStore>,
        options,
    ))
}

/// Connects and waits for both content and theme.
pub async fn live_view(
    config: &Config,
) -> Result<(ContentSynchronizer, SiteView), Box<dyn std::error::Error>> {
    let sync = connect(config).await?;
    let view = sync.wait_until_ready(READY_TIMEOUT).await?;
    Ok((sync, view))
}
