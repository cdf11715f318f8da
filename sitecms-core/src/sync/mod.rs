//! Keeping the live site in step with the remote store.
//!
//! [`ContentSynchronizer`] subscribes to the content and theme paths, merges
//! every snapshot over the defaults and publishes the result as a
//! [`SiteView`]. It is also the only way to write: [`ContentSynchronizer::save`]
//! replaces both trees and lets the store's change notification bring the
//! saved value back.
//!
//! ## Phases
//!
//! 1. `Initializing` until both subscriptions are registered
//! 2. `Loading` until content and theme have each delivered a snapshot
//! 3. `Ready`, updated in place on every later snapshot
//! 4. `Error` when a subscription fails; the last content is kept and the
//!    next snapshot on that path recovers

mod error;
mod state;
mod synchronizer;

pub use error::{PathWriteError, ReadyError, SaveError, SyncFailure};
pub use state::{SiteView, SyncPhase};
pub use synchronizer::{ContentSynchronizer, SyncOptions};
