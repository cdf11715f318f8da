//! Staging edits before they reach the store.
//!
//! A [`DraftEditor`] starts as a copy of the live site and follows it until
//! the first edit. Edits stay local until [`DraftEditor::commit`] hands the
//! whole draft to [`ContentSynchronizer::save`](crate::sync::ContentSynchronizer::save).

mod collection;
mod editor;
mod error;
mod field;

pub use collection::Collection;
pub use editor::{DraftEditor, StoredDraft};
pub use error::DraftError;
pub use field::{ContentField, ThemeField};
