//! Sync error types.

use thiserror::Error;

use crate::store::{StoreError, StorePath};

/// A subscription the store rejected or dropped.
///
/// Held in [`SiteView::error`](super::SiteView) rather than returned, so
/// readers keep rendering the last known content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("subscription to {path} failed: {source}")]
pub struct SyncFailure {
    pub path: StorePath,
    #[source]
    pub source: StoreError,
}

/// One path a save could not write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathWriteError {
    pub path: StorePath,
    pub error: StoreError,
}

#[derive(Debug, Error)]
pub enum SaveError {
    /// No session, or the session is no longer valid. Nothing was written.
    #[error("not authorized to save: sign in first")]
    AuthorizationMissing,
    #[error("failed to encode site data: {0}")]
    Encode(#[from] serde_json::Error),
    /// One or both writes failed. With `partial`, the other path was written.
    #[error("{}", describe_write_failure(failures, *partial))]
    Write {
        failures: Vec<PathWriteError>,
        partial: bool,
    },
}

impl SaveError {
    pub fn is_partial(&self) -> bool {
        matches!(self, SaveError::Write { partial: true, .. })
    }
}

fn describe_write_failure(failures: &[PathWriteError], partial: bool) -> String {
    let details: Vec<String> = failures
        .iter()
        .map(|f| format!("{} ({})", f.path, f.error))
        .collect();
    if partial {
        format!("save partially failed: {}", details.join(", "))
    } else {
        format!("save failed: {}", details.join(", "))
    }
}

/// Why [`ContentSynchronizer::wait_until_ready`](super::ContentSynchronizer::wait_until_ready)
/// gave up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadyError {
    #[error(transparent)]
    Failed(#[from] SyncFailure),
    #[error("timed out waiting for site content")]
    TimedOut,
}
