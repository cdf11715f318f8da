//! The content synchronizer.

use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

use super::error::{PathWriteError, ReadyError, SaveError, SyncFailure};
use super::state::{SiteView, SyncPhase};
use crate::auth::Session;
use crate::merge::merge_snapshot;
use crate::models::{ContentState, ThemeSettings};
use crate::store::{RemoteStore, SnapshotListener, StoreError, StorePath, StorePaths, Subscription};

/// Options for [`ContentSynchronizer::start`].
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub paths: StorePaths,
    /// Write the defaults back to a path that has no data yet, as this
    /// principal. Off when `None`.
    pub heal_empty_paths: Option<Session>,
}

impl SyncOptions {
    pub fn with_paths(mut self, paths: StorePaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn heal_empty_paths(mut self, session: Session) -> Self {
        self.heal_empty_paths = Some(session);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slice {
    Content,
    Theme,
}

struct Shared {
    view: watch::Sender<SiteView>,
    paths: StorePaths,
    default_content: ContentState,
    default_theme: ThemeSettings,
    heal: Option<mpsc::UnboundedSender<Slice>>,
}

struct SliceListener {
    slice: Slice,
    shared: Arc<Shared>,
}

impl SliceListener {
    fn path(&self) -> &StorePath {
        match self.slice {
            Slice::Content => &self.shared.paths.content,
            Slice::Theme => &self.shared.paths.theme,
        }
    }
}

impl SnapshotListener for SliceListener {
    fn on_snapshot(&self, value: Option<Value>) {
        let path = self.path();
        let empty = value.as_ref().map_or(true, Value::is_null);
        tracing::debug!(path = %path, empty, "Applying snapshot");

        match self.slice {
            Slice::Content => {
                let merged = merge_snapshot(&self.shared.default_content, value.as_ref());
                if !merged.rejected_keys.is_empty() {
                    tracing::warn!(path = %path, keys = ?merged.rejected_keys, "Ignored unusable keys in snapshot");
                }
                self.shared
                    .view
                    .send_modify(|view| view.apply_content(merged.value, path));
            }
            Slice::Theme => {
                let merged = merge_snapshot(&self.shared.default_theme, value.as_ref());
                if !merged.rejected_keys.is_empty() {
                    tracing::warn!(path = %path, keys = ?merged.rejected_keys, "Ignored unusable keys in snapshot");
                }
                self.shared
                    .view
                    .send_modify(|view| view.apply_theme(merged.value, path));
            }
        }

        if empty {
            if let Some(heal) = &self.shared.heal {
                let _ = heal.send(self.slice);
            }
        }
    }

    fn on_error(&self, error: StoreError) {
        let path = self.path();
        tracing::warn!(path = %path, error = %error, "Subscription failed");
        let failure = SyncFailure {
            path: path.clone(),
            source: error,
        };
        self.shared.view.send_modify(|view| view.fail(failure));
    }
}

/// Keeps an in-memory copy of the site in step with the remote store.
///
/// Owns both subscriptions for its whole life; they are released by
/// [`shutdown`](Self::shutdown) or on drop. Local state only ever advances
/// from store snapshots, never from this process's own saves.
pub struct ContentSynchronizer {
    store: Arc<dyn RemoteStore>,
    shared: Arc<Shared>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl ContentSynchronizer {
    /// Subscribes to the content and theme paths.
    ///
    /// Healing runs in a background task and needs a Tokio runtime; without
    /// one it is skipped.
    pub fn start(store: Arc<dyn RemoteStore>, options: SyncOptions) -> Self {
        let default_content = ContentState::default();
        let default_theme = ThemeSettings::default();
        let (view, _) = watch::channel(SiteView::initial(
            Arc::new(default_content.clone()),
            Arc::new(default_theme.clone()),
        ));

        let heal = options
            .heal_empty_paths
            .and_then(|session| spawn_healer(store.clone(), options.paths.clone(), session));

        let shared = Arc::new(Shared {
            view,
            paths: options.paths,
            default_content,
            default_theme,
            heal,
        });

        tracing::info!(
            content = %shared.paths.content,
            theme = %shared.paths.theme,
            "Starting content sync"
        );

        let mut subscriptions = Vec::with_capacity(2);
        for slice in [Slice::Content, Slice::Theme] {
            let listener = Arc::new(SliceListener {
                slice,
                shared: shared.clone(),
            });
            let path = listener.path().clone();
            subscriptions.push(store.subscribe(&path, listener));
        }
        shared.view.send_modify(SiteView::subscriptions_started);

        Self {
            store,
            shared,
            subscriptions: Mutex::new(subscriptions),
        }
    }

    /// Current state of the live site.
    pub fn view(&self) -> SiteView {
        self.shared.view.borrow().clone()
    }

    /// A receiver notified on every state change.
    pub fn watch(&self) -> watch::Receiver<SiteView> {
        self.shared.view.subscribe()
    }

    pub fn paths(&self) -> &StorePaths {
        &self.shared.paths
    }

    /// Waits until both paths have delivered, or a subscription fails.
    pub async fn wait_until_ready(&self, timeout: Duration) -> Result<SiteView, ReadyError> {
        let mut rx = self.watch();
        let wait = rx.wait_for(|view| matches!(view.phase, SyncPhase::Ready | SyncPhase::Error));
        let view = match tokio::time::timeout(timeout, wait).await {
            Ok(Ok(view)) => view.clone(),
            // The sender lives as long as `self`.
            Ok(Err(_)) | Err(_) => return Err(ReadyError::TimedOut),
        };
        match view.error {
            Some(failure) => Err(ReadyError::Failed(failure)),
            None => Ok(view),
        }
    }

    /// Writes both trees to the store concurrently.
    ///
    /// Fails fast with [`SaveError::AuthorizationMissing`] without a valid
    /// session. Does not touch the local view: the store's change
    /// notification delivers the saved value.
    pub async fn save(
        &self,
        session: Option<&Session>,
        content: &ContentState,
        theme: &ThemeSettings,
    ) -> Result<(), SaveError> {
        let session = session
            .filter(|s| s.is_valid())
            .ok_or(SaveError::AuthorizationMissing)?;
        let content_value = serde_json::to_value(content)?;
        let theme_value = serde_json::to_value(theme)?;
        let paths = &self.shared.paths;

        tracing::info!(principal = %session.principal, "Saving site");
        let (content_result, theme_result) = tokio::join!(
            self.store.write(&paths.content, content_value, session),
            self.store.write(&paths.theme, theme_value, session),
        );

        let failures: Vec<PathWriteError> = [
            (&paths.content, content_result),
            (&paths.theme, theme_result),
        ]
        .into_iter()
        .filter_map(|(path, result)| {
            result.err().map(|error| PathWriteError {
                path: path.clone(),
                error,
            })
        })
        .collect();

        if failures.is_empty() {
            return Ok(());
        }
        let partial = failures.len() == 1;
        tracing::warn!(failed = failures.len(), partial, "Save failed");
        Err(SaveError::Write { failures, partial })
    }

    /// Releases both subscriptions. The view keeps its last state.
    pub fn shutdown(&self) {
        let subscriptions: Vec<Subscription> = self
            .subscriptions
            .lock()
            .map(|mut subs| subs.drain(..).collect())
            .unwrap_or_default();
        if !subscriptions.is_empty() {
            tracing::info!("Stopping content sync");
        }
        drop(subscriptions);
    }
}

fn spawn_healer(
    store: Arc<dyn RemoteStore>,
    paths: StorePaths,
    session: Session,
) -> Option<mpsc::UnboundedSender<Slice>> {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        tracing::warn!("No async runtime; healing of empty paths disabled");
        return None;
    };
    let (tx, mut rx) = mpsc::unbounded_channel();
    runtime.spawn(async move {
        while let Some(slice) = rx.recv().await {
            let (path, value) = match slice {
                Slice::Content => (&paths.content, serde_json::to_value(ContentState::default())),
                Slice::Theme => (&paths.theme, serde_json::to_value(ThemeSettings::default())),
            };
            let value = match value {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Failed to encode defaults");
                    continue;
                }
            };
            match store.write(path, value, &session).await {
                Ok(()) => tracing::info!(path = %path, "Wrote defaults to empty path"),
                Err(e) => tracing::warn!(path = %path, error = %e, "Failed to write defaults"),
            }
        }
    });
    Some(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn session() -> Session {
        Session::new("admin", "key-1")
    }

    fn start(store: &MemoryStore) -> ContentSynchronizer {
        ContentSynchronizer::start(Arc::new(store.clone()), SyncOptions::default())
    }

    #[tokio::test]
    async fn test_empty_store_reaches_ready_with_defaults() {
        let store = MemoryStore::new();
        let sync = start(&store);

        let view = sync.wait_until_ready(Duration::from_secs(1)).await.unwrap();
        assert!(!view.loading());
        assert_eq!(*view.content, ContentState::default());
        assert_eq!(*view.theme, ThemeSettings::default());
        assert!(view.error.is_none());
        // Healing is off by default.
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_partial_snapshot_merges_over_defaults() {
        let paths = StorePaths::default();
        let store = MemoryStore::new().with_value(&paths.content, json!({"siteName": "Acme"}));
        let sync = start(&store);

        let view = sync.view();
        assert_eq!(view.phase, SyncPhase::Ready);
        let mut expected = ContentState::default();
        expected.site_name = "Acme".to_string();
        assert_eq!(*view.content, expected);
    }

    #[tokio::test]
    async fn test_remote_change_updates_view() {
        let paths = StorePaths::default();
        let store = MemoryStore::new();
        let sync = start(&store);
        let mut rx = sync.watch();
        rx.borrow_and_update();

        store.push_snapshot(&paths.theme, Some(json!({"primaryColor": "#000000"})));

        assert!(rx.has_changed().unwrap());
        let view = rx.borrow_and_update().clone();
        assert_eq!(view.theme.primary_color, "#000000");
        assert_eq!(view.phase, SyncPhase::Ready);
    }

    #[tokio::test]
    async fn test_save_without_session_writes_nothing() {
        let store = MemoryStore::new();
        let sync = start(&store);
        let view = sync.view();

        let result = sync.save(None, &view.content, &view.theme).await;
        assert!(matches!(result, Err(SaveError::AuthorizationMissing)));

        let expired = Session::new("admin", "");
        let result = sync.save(Some(&expired), &view.content, &view.theme).await;
        assert!(matches!(result, Err(SaveError::AuthorizationMissing)));

        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_save_advances_view_only_through_snapshot() {
        let paths = StorePaths::default();
        let store = MemoryStore::new();
        let sync = start(&store);

        let mut content = (*sync.view().content).clone();
        content.site_name = "Saved".to_string();
        let theme = (*sync.view().theme).clone();

        sync.save(Some(&session()), &content, &theme).await.unwrap();

        assert_eq!(store.write_count(), 2);
        assert_eq!(store.value(&paths.content).unwrap()["siteName"], "Saved");
        assert_eq!(sync.view().content.site_name, "Saved");
    }

    #[tokio::test]
    async fn test_save_is_idempotent() {
        let paths = StorePaths::default();
        let store = MemoryStore::new();
        let sync = start(&store);
        let view = sync.view();

        sync.save(Some(&session()), &view.content, &view.theme).await.unwrap();
        let once = (store.value(&paths.content), store.value(&paths.theme));
        sync.save(Some(&session()), &view.content, &view.theme).await.unwrap();
        let twice = (store.value(&paths.content), store.value(&paths.theme));

        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_partial_write_failure() {
        let paths = StorePaths::default();
        let store = MemoryStore::new();
        store.fail_writes(&paths.theme, "quota exceeded");
        let sync = start(&store);
        let view = sync.view();

        let err = sync
            .save(Some(&session()), &view.content, &view.theme)
            .await
            .unwrap_err();
        assert!(err.is_partial());
        match err {
            SaveError::Write { failures, .. } => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].path, paths.theme);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.value(&paths.content).is_some());
    }

    #[tokio::test]
    async fn test_subscription_error_keeps_last_content() {
        let paths = StorePaths::default();
        let store = MemoryStore::new().with_value(&paths.content, json!({"siteName": "Acme"}));
        let sync = start(&store);

        store.emit_error(&paths.content, StoreError::Disconnected);
        let view = sync.view();
        assert_eq!(view.phase, SyncPhase::Error);
        assert!(!view.loading());
        assert_eq!(view.content.site_name, "Acme");
        assert_eq!(view.error.as_ref().unwrap().path, paths.content);

        store.push_snapshot(&paths.content, Some(json!({"siteName": "Back"})));
        let view = sync.view();
        assert_eq!(view.phase, SyncPhase::Ready);
        assert!(view.error.is_none());
        assert_eq!(view.content.site_name, "Back");
    }

    #[tokio::test]
    async fn test_wait_until_ready_reports_failure() {
        let paths = StorePaths::default();
        let store = MemoryStore::new();
        store.fail_subscriptions(&paths.theme, "permission denied");
        let sync = start(&store);

        let err = sync
            .wait_until_ready(Duration::from_secs(1))
            .await
            .unwrap_err();
        match err {
            ReadyError::Failed(failure) => assert_eq!(failure.path, paths.theme),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_wait_until_ready_times_out() {
        // A store that never answers.
        struct Silent;

        #[async_trait::async_trait]
        impl RemoteStore for Silent {
            fn subscribe(&self, path: &StorePath, _: Arc<dyn SnapshotListener>) -> Subscription {
                Subscription::inert(path.clone())
            }

            async fn write(&self, _: &StorePath, _: Value, _: &Session) -> Result<(), StoreError> {
                Ok(())
            }
        }

        let sync = ContentSynchronizer::start(Arc::new(Silent), SyncOptions::default());
        assert_eq!(sync.view().phase, SyncPhase::Loading);
        let err = sync
            .wait_until_ready(Duration::from_millis(20))
            .await
            .unwrap_err();
        assert_eq!(err, ReadyError::TimedOut);
    }

    #[tokio::test]
    async fn test_healing_writes_defaults_to_empty_paths() {
        let paths = StorePaths::default();
        let store = MemoryStore::new().with_value(&paths.theme, json!({"font": "serif"}));
        let options = SyncOptions::default().heal_empty_paths(session());
        let sync = ContentSynchronizer::start(Arc::new(store.clone()), options);

        // The healer runs on its own task.
        for _ in 0..50 {
            if store.write_count() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].path, paths.content);
        assert_eq!(writes[0].principal, "admin");
        assert_eq!(sync.view().content.site_name, ContentState::default().site_name);
        assert_eq!(sync.view().theme.font, "serif");
    }

    #[tokio::test]
    async fn test_failed_healing_does_not_block_ready() {
        let paths = StorePaths::default();
        let store = MemoryStore::new();
        store.fail_writes(&paths.content, "read-only");
        store.fail_writes(&paths.theme, "read-only");
        let options = SyncOptions::default().heal_empty_paths(session());
        let sync = ContentSynchronizer::start(Arc::new(store.clone()), options);

        let view = sync.wait_until_ready(Duration::from_secs(1)).await.unwrap();
        assert!(view.error.is_none());
        tokio::task::yield_now().await;
        assert_eq!(sync.view().phase, SyncPhase::Ready);
    }

    #[tokio::test]
    async fn test_shutdown_releases_subscriptions() {
        let paths = StorePaths::default();
        let store = MemoryStore::new();
        let sync = start(&store);
        assert_eq!(store.listener_count(&paths.content), 1);
        assert_eq!(store.listener_count(&paths.theme), 1);

        sync.shutdown();
        assert_eq!(store.listener_count(&paths.content), 0);
        assert_eq!(store.listener_count(&paths.theme), 0);

        store.push_snapshot(&paths.content, Some(json!({"siteName": "Later"})));
        assert_ne!(sync.view().content.site_name, "Later");
    }

    #[tokio::test]
    async fn test_drop_releases_subscriptions() {
        let paths = StorePaths::default();
        let store = MemoryStore::new();
        {
            let _sync = start(&store);
            assert_eq!(store.listener_count(&paths.content), 1);
        }
        assert_eq!(store.listener_count(&paths.content), 0);
    }
}
