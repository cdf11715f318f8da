//! Fan-out of value changes to connected clients.

use serde_json::Value;
use sitecms_core::StorePath;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};

/// Channel buffer per path. A subscriber that falls further behind gets
/// `Lagged` and reloads from storage.
const CHANNEL_CAPACITY: usize = 16;

/// A value that was just written to a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub path: StorePath,
    pub value: Option<Value>,
}

/// Tracks broadcast channels for every watched path.
pub struct SnapshotHub {
    channels: RwLock<HashMap<StorePath, broadcast::Sender<Update>>>,
}

impl SnapshotHub {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribes to updates for a path.
    pub async fn subscribe(&self, path: &StorePath) -> broadcast::Receiver<Update> {
        let mut channels = self.channels.write().await;

        if let Some(sender) = channels.get(path) {
            sender.subscribe()
        } else {
            let (sender, receiver) = broadcast::channel(CHANNEL_CAPACITY);
            channels.insert(path.clone(), sender);
            receiver
        }
    }

    /// Broadcasts a new value to everyone watching its path.
    pub async fn broadcast(&self, update: Update) {
        let path = update.path.clone();
        let orphaned = {
            let channels = self.channels.read().await;
            match channels.get(&path) {
                // Send only fails when every receiver is gone.
                Some(sender) => sender.send(update).is_err(),
                None => false,
            }
        };
        if orphaned {
            self.release(&path).await;
        }
    }

    /// Drops the channel for a path once nobody receives from it.
    /// Returns whether it was dropped.
    pub async fn release(&self, path: &StorePath) -> bool {
        let mut channels = self.channels.write().await;
        let unused = channels
            .get(path)
            .is_some_and(|sender| sender.receiver_count() == 0);
        if unused {
            channels.remove(path);
            tracing::debug!(path = %path, "Released channel");
        }
        unused
    }

    /// Number of live receivers for a path.
    pub async fn receiver_count(&self, path: &StorePath) -> usize {
        self.channels
            .read()
            .await
            .get(path)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Number of paths with an open channel.
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

impl Default for SnapshotHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(p: &str) -> StorePath {
        StorePath::parse(p).unwrap()
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscribers_of_path() {
        let hub = SnapshotHub::new();
        let mut content = hub.subscribe(&path("site/content")).await;
        let mut theme = hub.subscribe(&path("site/theme")).await;

        hub.broadcast(Update {
            path: path("site/content"),
            value: Some(json!({"siteName": "Acme"})),
        })
        .await;

        let update = content.recv().await.unwrap();
        assert_eq!(update.value, Some(json!({"siteName": "Acme"})));
        assert!(theme.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers_is_noop() {
        let hub = SnapshotHub::new();
        hub.broadcast(Update {
            path: path("site/content"),
            value: None,
        })
        .await;
        assert_eq!(hub.receiver_count(&path("site/content")).await, 0);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_share_channel() {
        let hub = SnapshotHub::new();
        let p = path("site/theme");
        let mut a = hub.subscribe(&p).await;
        let mut b = hub.subscribe(&p).await;
        assert_eq!(hub.receiver_count(&p).await, 2);

        hub.broadcast(Update {
            path: p.clone(),
            value: Some(json!({})),
        })
        .await;

        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());

        drop(a);
        assert_eq!(hub.receiver_count(&p).await, 1);
    }

    #[tokio::test]
    async fn test_release_drops_unused_channel() {
        let hub = SnapshotHub::new();
        let p = path("site/content");
        let a = hub.subscribe(&p).await;
        let b = hub.subscribe(&p).await;

        drop(a);
        assert!(!hub.release(&p).await);
        assert_eq!(hub.channel_count().await, 1);

        drop(b);
        assert!(hub.release(&p).await);
        assert_eq!(hub.channel_count().await, 0);
        assert!(!hub.release(&p).await);
    }

    #[tokio::test]
    async fn test_broadcast_drops_abandoned_channel() {
        let hub = SnapshotHub::new();
        for i in 0..50 {
            let p = path(&format!("sites/{}/content", i));
            drop(hub.subscribe(&p).await);
            hub.broadcast(Update {
                path: p,
                value: None,
            })
            .await;
        }
        assert_eq!(hub.channel_count().await, 0);
    }
}
