//! Sitecms Core Library
//!
//! Content model and sync engine for a marketing site with an editing panel:
//! the site's content and theme live in a realtime store, every reader
//! follows them through a [`ContentSynchronizer`], and editors stage changes
//! in a [`DraftEditor`] before committing them back.

pub mod auth;
pub mod draft;
pub mod health;
pub mod merge;
pub mod models;
pub mod store;
pub mod sync;

pub use auth::Session;
pub use draft::{Collection, ContentField, DraftEditor, DraftError, StoredDraft, ThemeField};
pub use health::{check_server, server_health, ServerHealth};
pub use merge::{merge_snapshot, Merged};
pub use models::{ContentState, IconSetting, Project, Record, RecordId, ThemeSettings};
pub use store::{
    MemoryStore, RemoteStore, SnapshotListener, StoreError, StorePath, StorePaths, Subscription,
    WsStore,
};
pub use sync::{
    ContentSynchronizer, ReadyError, SaveError, SiteView, SyncFailure, SyncOptions, SyncPhase,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
