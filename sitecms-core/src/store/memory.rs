//! In-process store.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use super::{RemoteStore, SnapshotListener, StoreError, StorePath, Subscription};
use crate::auth::Session;

/// A write accepted by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    pub path: StorePath,
    pub value: Value,
    pub principal: String,
}

type ListenerEntry = (u64, Arc<dyn SnapshotListener>);

#[derive(Default)]
struct Inner {
    values: HashMap<StorePath, Value>,
    listeners: HashMap<StorePath, Vec<ListenerEntry>>,
    next_listener: u64,
    failing_writes: HashMap<StorePath, String>,
    failing_subscriptions: HashMap<StorePath, String>,
    accepted_tokens: Option<Vec<String>>,
    writes: Vec<WriteRecord>,
    defer_notifications: bool,
    pending: Vec<(StorePath, Option<Value>)>,
}

/// Realtime store kept in memory.
///
/// Behaves like the hosted store the site runs against: the current value is
/// delivered synchronously on subscribe, every write replaces the whole value
/// and notifies every listener on that path, and writing `null` clears the
/// path. Faults can be injected per path, and write notifications can be
/// held back to arrive after the write resolves.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` without notifying anyone.
    pub fn with_value(self, path: &StorePath, value: Value) -> Self {
        self.lock().values.insert(path.clone(), value);
        self
    }

    /// Only writes carrying one of these tokens are accepted.
    pub fn with_accepted_tokens<I, S>(self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().accepted_tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Writes resolve before their listeners hear of them. Held snapshots
    /// go out on [`flush_notifications`](Self::flush_notifications).
    pub fn with_deferred_notifications(self) -> Self {
        self.lock().defer_notifications = true;
        self
    }

    /// Delivers every snapshot held back since the last flush, oldest
    /// first. Returns how many were delivered.
    pub fn flush_notifications(&self) -> usize {
        let pending = std::mem::take(&mut self.lock().pending);
        let count = pending.len();
        for (path, value) in pending {
            let listeners = self.lock().listeners_for(&path);
            notify(&listeners, &value);
        }
        count
    }

    /// Delivers only the oldest held snapshot. Returns whether there was one.
    pub fn flush_next_notification(&self) -> bool {
        let next = {
            let mut inner = self.lock();
            if inner.pending.is_empty() {
                return false;
            }
            let (path, value) = inner.pending.remove(0);
            (inner.listeners_for(&path), value)
        };
        let (listeners, value) = next;
        notify(&listeners, &value);
        true
    }

    pub fn pending_notifications(&self) -> usize {
        self.lock().pending.len()
    }

    /// Replaces the value at `path` as another client would, notifying
    /// listeners. Bypasses authorization and injected write faults.
    pub fn push_snapshot(&self, path: &StorePath, value: Option<Value>) {
        let listeners = {
            let mut inner = self.lock();
            match &value {
                Some(v) if !v.is_null() => {
                    inner.values.insert(path.clone(), v.clone());
                }
                _ => {
                    inner.values.remove(path);
                }
            }
            inner.listeners_for(path)
        };
        notify(&listeners, &value);
    }

    /// Sends `error` to every listener on `path`.
    pub fn emit_error(&self, path: &StorePath, error: StoreError) {
        let listeners = self.lock().listeners_for(path);
        for listener in listeners {
            listener.on_error(error.clone());
        }
    }

    /// Makes every later write to `path` fail with `message`.
    pub fn fail_writes(&self, path: &StorePath, message: impl Into<String>) {
        self.lock()
            .failing_writes
            .insert(path.clone(), message.into());
    }

    /// Makes every later subscription to `path` fail with `message`.
    pub fn fail_subscriptions(&self, path: &StorePath, message: impl Into<String>) {
        self.lock()
            .failing_subscriptions
            .insert(path.clone(), message.into());
    }

    pub fn clear_faults(&self) {
        let mut inner = self.lock();
        inner.failing_writes.clear();
        inner.failing_subscriptions.clear();
    }

    pub fn value(&self, path: &StorePath) -> Option<Value> {
        self.lock().values.get(path).cloned()
    }

    /// Every accepted write, oldest first.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.lock().writes.clone()
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes.len()
    }

    pub fn listener_count(&self, path: &StorePath) -> usize {
        self.lock().listeners.get(path).map_or(0, Vec::len)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock_inner(&self.inner)
    }
}

impl Inner {
    fn listeners_for(&self, path: &StorePath) -> Vec<Arc<dyn SnapshotListener>> {
        self.listeners
            .get(path)
            .map(|entries| entries.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default()
    }
}

fn lock_inner(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// Listeners run outside the lock so they may call back into the store.
fn notify(listeners: &[Arc<dyn SnapshotListener>], value: &Option<Value>) {
    for listener in listeners {
        listener.on_snapshot(value.clone());
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    fn subscribe(&self, path: &StorePath, listener: Arc<dyn SnapshotListener>) -> Subscription {
        let current = {
            let mut inner = self.lock();
            let failure = inner.failing_subscriptions.get(path).cloned();
            if let Some(message) = failure {
                drop(inner);
                listener.on_error(StoreError::Rejected(message));
                return Subscription::inert(path.clone());
            }
            let id = inner.next_listener;
            inner.next_listener += 1;
            inner
                .listeners
                .entry(path.clone())
                .or_default()
                .push((id, listener.clone()));
            let current = inner.values.get(path).cloned();

            let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
            let key = path.clone();
            let cancel = move || {
                if let Some(inner) = weak.upgrade() {
                    let mut inner = lock_inner(&inner);
                    if let Some(entries) = inner.listeners.get_mut(&key) {
                        entries.retain(|(entry_id, _)| *entry_id != id);
                        if entries.is_empty() {
                            inner.listeners.remove(&key);
                        }
                    }
                }
            };
            (current, cancel)
        };

        let (value, cancel) = current;
        tracing::debug!(path = %path, present = value.is_some(), "Delivering initial snapshot");
        listener.on_snapshot(value);
        Subscription::new(path.clone(), cancel)
    }

    async fn write(
        &self,
        path: &StorePath,
        value: Value,
        session: &Session,
    ) -> Result<(), StoreError> {
        let (listeners, delivered) = {
            let mut inner = self.lock();
            if let Some(tokens) = &inner.accepted_tokens {
                if !tokens.iter().any(|t| *t == session.token) {
                    return Err(StoreError::Rejected("permission denied".to_string()));
                }
            }
            if let Some(message) = inner.failing_writes.get(path) {
                return Err(StoreError::Unavailable(message.clone()));
            }

            inner.writes.push(WriteRecord {
                path: path.clone(),
                value: value.clone(),
                principal: session.principal.clone(),
            });
            let delivered = if value.is_null() {
                inner.values.remove(path);
                None
            } else {
                inner.values.insert(path.clone(), value.clone());
                Some(value)
            };
            if inner.defer_notifications {
                inner.pending.push((path.clone(), delivered));
                return Ok(());
            }
            (inner.listeners_for(path), delivered)
        };

        notify(&listeners, &delivered);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CallbackListener;
    use serde_json::json;

    fn path(p: &str) -> StorePath {
        StorePath::parse(p).unwrap()
    }

    fn recording() -> (
        Arc<dyn SnapshotListener>,
        Arc<Mutex<Vec<Option<Value>>>>,
        Arc<Mutex<Vec<StoreError>>>,
    ) {
        let snapshots = Arc::new(Mutex::new(Vec::new()));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let s = snapshots.clone();
        let e = errors.clone();
        let listener = CallbackListener::new(
            move |value| s.lock().unwrap().push(value),
            move |error| e.lock().unwrap().push(error),
        );
        (listener, snapshots, errors)
    }

    #[test]
    fn test_subscribe_delivers_absent_value_immediately() {
        let store = MemoryStore::new();
        let (listener, snapshots, _) = recording();
        let _sub = store.subscribe(&path("site/content"), listener);
        assert_eq!(*snapshots.lock().unwrap(), vec![None]);
    }

    #[test]
    fn test_subscribe_delivers_current_value() {
        let store = MemoryStore::new().with_value(&path("site/theme"), json!({"font": "serif"}));
        let (listener, snapshots, _) = recording();
        let _sub = store.subscribe(&path("site/theme"), listener);
        assert_eq!(
            *snapshots.lock().unwrap(),
            vec![Some(json!({"font": "serif"}))]
        );
    }

    #[tokio::test]
    async fn test_write_replaces_and_notifies() {
        let store = MemoryStore::new();
        let p = path("site/content");
        let (listener, snapshots, _) = recording();
        let _sub = store.subscribe(&p, listener);

        let session = Session::new("alice", "key");
        store.write(&p, json!({"siteName": "A", "tagline": "x"}), &session).await.unwrap();
        store.write(&p, json!({"siteName": "B"}), &session).await.unwrap();

        assert_eq!(store.value(&p), Some(json!({"siteName": "B"})));
        let seen = snapshots.lock().unwrap().clone();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], Some(json!({"siteName": "B"})));

        let writes = store.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].principal, "alice");
    }

    #[tokio::test]
    async fn test_writing_null_clears_path() {
        let p = path("site/content");
        let store = MemoryStore::new().with_value(&p, json!({"siteName": "A"}));
        store.write(&p, Value::Null, &Session::new("a", "k")).await.unwrap();
        assert_eq!(store.value(&p), None);
    }

    #[tokio::test]
    async fn test_deferred_notifications_arrive_on_flush() {
        let store = MemoryStore::new().with_deferred_notifications();
        let p = path("site/content");
        let (listener, snapshots, _) = recording();
        let _sub = store.subscribe(&p, listener);

        let session = Session::new("alice", "key");
        store.write(&p, json!({"siteName": "A"}), &session).await.unwrap();
        store.write(&p, Value::Null, &session).await.unwrap();

        assert_eq!(store.value(&p), None);
        assert_eq!(snapshots.lock().unwrap().len(), 1);
        assert_eq!(store.pending_notifications(), 2);

        assert!(store.flush_next_notification());
        assert_eq!(snapshots.lock().unwrap().len(), 2);
        assert_eq!(store.flush_notifications(), 1);
        let seen = snapshots.lock().unwrap().clone();
        assert_eq!(seen, vec![None, Some(json!({"siteName": "A"})), None]);
        assert_eq!(store.flush_notifications(), 0);
        assert!(!store.flush_next_notification());
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_notifications() {
        let store = MemoryStore::new();
        let p = path("site/content");
        let (listener, snapshots, _) = recording();
        let sub = store.subscribe(&p, listener);
        assert_eq!(store.listener_count(&p), 1);

        sub.unsubscribe();
        assert_eq!(store.listener_count(&p), 0);

        store.write(&p, json!({}), &Session::new("a", "k")).await.unwrap();
        assert_eq!(snapshots.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_injected_write_failure() {
        let store = MemoryStore::new();
        let p = path("site/theme");
        store.fail_writes(&p, "network down");

        let result = store.write(&p, json!({}), &Session::new("a", "k")).await;
        assert_eq!(result, Err(StoreError::Unavailable("network down".to_string())));
        assert_eq!(store.write_count(), 0);

        store.clear_faults();
        store.write(&p, json!({}), &Session::new("a", "k")).await.unwrap();
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let store = MemoryStore::new().with_accepted_tokens(["good"]);
        let p = path("site/theme");

        let result = store.write(&p, json!({}), &Session::new("mallory", "bad")).await;
        assert!(matches!(result, Err(StoreError::Rejected(_))));

        store.write(&p, json!({}), &Session::new("alice", "good")).await.unwrap();
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_failing_subscription_reports_error() {
        let store = MemoryStore::new();
        let p = path("site/content");
        store.fail_subscriptions(&p, "permission denied");

        let (listener, snapshots, errors) = recording();
        let sub = store.subscribe(&p, listener);

        assert!(!sub.is_active());
        assert!(snapshots.lock().unwrap().is_empty());
        assert_eq!(
            *errors.lock().unwrap(),
            vec![StoreError::Rejected("permission denied".to_string())]
        );
    }

    #[test]
    fn test_push_snapshot_and_emit_error() {
        let store = MemoryStore::new();
        let p = path("site/content");
        let (listener, snapshots, errors) = recording();
        let _sub = store.subscribe(&p, listener);

        store.push_snapshot(&p, Some(json!({"siteName": "X"})));
        store.emit_error(&p, StoreError::Disconnected);

        assert_eq!(snapshots.lock().unwrap().len(), 2);
        assert_eq!(*errors.lock().unwrap(), vec![StoreError::Disconnected]);
        assert_eq!(store.write_count(), 0);
    }
}
