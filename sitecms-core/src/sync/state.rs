//! What readers of the live site observe.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::error::SyncFailure;
use crate::models::{ContentState, ThemeSettings};
use crate::store::StorePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    /// Subscriptions are being set up.
    Initializing,
    /// Waiting for the first snapshot of content and theme.
    Loading,
    Ready,
    /// A subscription failed. Content is the last known value.
    Error,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncPhase::Initializing => "initializing",
            SyncPhase::Loading => "loading",
            SyncPhase::Ready => "ready",
            SyncPhase::Error => "error",
        };
        f.write_str(s)
    }
}

/// A read-only view of the live site.
///
/// Content and theme are shared snapshots; a new snapshot from the store
/// replaces them, it never mutates them in place.
#[derive(Debug, Clone)]
pub struct SiteView {
    pub content: Arc<ContentState>,
    pub theme: Arc<ThemeSettings>,
    pub phase: SyncPhase,
    pub error: Option<SyncFailure>,
    content_received: bool,
    theme_received: bool,
    revision: u64,
    content_revision: u64,
    theme_revision: u64,
}

impl SiteView {
    pub(crate) fn initial(content: Arc<ContentState>, theme: Arc<ThemeSettings>) -> Self {
        Self {
            content,
            theme,
            phase: SyncPhase::Initializing,
            error: None,
            content_received: false,
            theme_received: false,
            revision: 0,
            content_revision: 0,
            theme_revision: 0,
        }
    }

    pub fn loading(&self) -> bool {
        matches!(self.phase, SyncPhase::Initializing | SyncPhase::Loading)
    }

    pub fn is_ready(&self) -> bool {
        self.phase == SyncPhase::Ready
    }

    /// Number of snapshots applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Revision at which the current content snapshot was applied.
    pub fn content_revision(&self) -> u64 {
        self.content_revision
    }

    /// Revision at which the current theme snapshot was applied.
    pub fn theme_revision(&self) -> u64 {
        self.theme_revision
    }

    pub(crate) fn subscriptions_started(&mut self) {
        if self.phase == SyncPhase::Initializing {
            self.phase = SyncPhase::Loading;
        }
    }

    pub(crate) fn apply_content(&mut self, content: ContentState, path: &StorePath) {
        self.content = Arc::new(content);
        self.content_received = true;
        self.snapshot_applied(path);
        self.content_revision = self.revision;
    }

    pub(crate) fn apply_theme(&mut self, theme: ThemeSettings, path: &StorePath) {
        self.theme = Arc::new(theme);
        self.theme_received = true;
        self.snapshot_applied(path);
        self.theme_revision = self.revision;
    }

    pub(crate) fn fail(&mut self, failure: SyncFailure) {
        self.phase = SyncPhase::Error;
        self.error = Some(failure);
    }

    fn snapshot_applied(&mut self, path: &StorePath) {
        self.revision += 1;
        // A snapshot only clears an error raised by its own subscription.
        if self.error.as_ref().is_some_and(|e| e.path == *path) {
            self.error = None;
        }
        self.phase = if self.error.is_some() {
            SyncPhase::Error
        } else if self.content_received && self.theme_received {
            SyncPhase::Ready
        } else {
            SyncPhase::Loading
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreError, StorePaths};

    fn view() -> SiteView {
        SiteView::initial(
            Arc::new(ContentState::default()),
            Arc::new(ThemeSettings::default()),
        )
    }

    #[test]
    fn test_ready_needs_both_paths() {
        let paths = StorePaths::default();
        let mut view = view();
        assert!(view.loading());
        view.subscriptions_started();
        assert_eq!(view.phase, SyncPhase::Loading);

        // Repeated content snapshots never count for the theme.
        view.apply_content(ContentState::default(), &paths.content);
        view.apply_content(ContentState::default(), &paths.content);
        assert_eq!(view.phase, SyncPhase::Loading);

        view.apply_theme(ThemeSettings::default(), &paths.theme);
        assert_eq!(view.phase, SyncPhase::Ready);
        assert!(!view.loading());
        assert_eq!(view.revision(), 3);
        assert_eq!(view.content_revision(), 2);
        assert_eq!(view.theme_revision(), 3);
    }

    #[test]
    fn test_error_keeps_content_and_clears_on_snapshot() {
        let paths = StorePaths::default();
        let mut view = view();
        let mut content = ContentState::default();
        content.site_name = "Acme".to_string();
        view.apply_content(content.clone(), &paths.content);
        view.apply_theme(ThemeSettings::default(), &paths.theme);

        view.fail(SyncFailure {
            path: paths.content.clone(),
            source: StoreError::Disconnected,
        });
        assert_eq!(view.phase, SyncPhase::Error);
        assert!(!view.loading());
        assert_eq!(view.content.site_name, "Acme");

        // A theme snapshot does not clear the content subscription's error.
        view.apply_theme(ThemeSettings::default(), &paths.theme);
        assert_eq!(view.phase, SyncPhase::Error);

        view.apply_content(content, &paths.content);
        assert_eq!(view.phase, SyncPhase::Ready);
        assert!(view.error.is_none());
    }

    #[test]
    fn test_recovery_before_both_delivered_goes_to_loading() {
        let paths = StorePaths::default();
        let mut view = view();
        view.subscriptions_started();
        view.fail(SyncFailure {
            path: paths.content.clone(),
            source: StoreError::Disconnected,
        });
        view.apply_content(ContentState::default(), &paths.content);
        assert_eq!(view.phase, SyncPhase::Loading);
    }
}
