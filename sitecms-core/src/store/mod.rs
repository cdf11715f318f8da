//! Remote store adapter.
//!
//! The rest of the crate only needs two capabilities from the store:
//! subscribing to the full value at a path and replacing the full value at a
//! path. There are no queries, transactions or partial updates.
//!
//! Two implementations ship with the crate:
//! - [`MemoryStore`]: in-process, with fault injection for tests
//! - [`WsStore`]: client for `sitecms-server` over WebSocket

mod memory;
mod path;
pub mod protocol;
mod ws;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::Session;

pub use memory::{MemoryStore, WriteRecord};
pub use path::{PathError, StorePath, StorePaths, DEFAULT_NAMESPACE};
pub use ws::{http_url, ws_url, WsStore};

/// Errors reported by a remote store, either to a listener or to a writer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("disconnected from store")]
    Disconnected,
    #[error("rejected by store: {0}")]
    Rejected(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Receives every value stored at a subscribed path.
///
/// `on_snapshot(None)` means nothing has been written to the path yet.
pub trait SnapshotListener: Send + Sync {
    fn on_snapshot(&self, value: Option<Value>);

    fn on_error(&self, error: StoreError);
}

/// Listener built from two closures.
pub struct CallbackListener<S, E> {
    on_snapshot: S,
    on_error: E,
}

impl<S, E> CallbackListener<S, E>
where
    S: Fn(Option<Value>) + Send + Sync,
    E: Fn(StoreError) + Send + Sync,
{
    pub fn new(on_snapshot: S, on_error: E) -> Arc<Self> {
        Arc::new(Self {
            on_snapshot,
            on_error,
        })
    }
}

impl<S, E> SnapshotListener for CallbackListener<S, E>
where
    S: Fn(Option<Value>) + Send + Sync,
    E: Fn(StoreError) + Send + Sync,
{
    fn on_snapshot(&self, value: Option<Value>) {
        (self.on_snapshot)(value)
    }

    fn on_error(&self, error: StoreError) {
        (self.on_error)(error)
    }
}

/// A realtime key-value store holding whole JSON trees at paths.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Registers `listener` for `path`.
    ///
    /// The current value is delivered as soon as it is known, then again on
    /// every change, until the returned handle is dropped.
    fn subscribe(&self, path: &StorePath, listener: Arc<dyn SnapshotListener>) -> Subscription;

    /// Replaces the entire value at `path`.
    async fn write(&self, path: &StorePath, value: Value, session: &Session)
        -> Result<(), StoreError>;
}

/// Handle for an active subscription.
///
/// The listener is released exactly once: on [`Subscription::unsubscribe`]
/// or on drop, whichever comes first.
pub struct Subscription {
    path: StorePath,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(path: StorePath, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            path,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to release, for subscriptions that never started.
    pub fn inert(path: StorePath) -> Self {
        Self { path, cancel: None }
    }

    pub fn path(&self) -> &StorePath {
        &self.path
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            tracing::debug!(path = %self.path, "Unsubscribing");
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("path", &self.path)
            .field("active", &self.is_active())
            .finish()
    }
}
