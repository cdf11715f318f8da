//! The draft an editor works on between commits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::collection::Collection;
use super::error::DraftError;
use super::field::{ContentField, ThemeField};
use crate::auth::Session;
use crate::models::{
    ContentState, FloatingButton, IconSetting, Project, Record, RecordId, Service, ThemeSettings,
};
use crate::sync::{ContentSynchronizer, SaveError, SiteView};

/// Local working copy of the site.
///
/// Starts as the authoritative content and theme. Edits copy the shared
/// snapshot first, so the live view is never touched. The only way back to
/// the store is [`commit`](Self::commit).
#[derive(Debug, Clone)]
pub struct DraftEditor {
    content: Arc<ContentState>,
    theme: Arc<ThemeSettings>,
    dirty: bool,
    pulled_at: DateTime<Utc>,
    content_sync: PartSync,
    theme_sync: PartSync,
}

/// How one part of the draft follows the view.
#[derive(Debug, Clone, Copy, Default)]
struct PartSync {
    /// Revision of the newest snapshot already considered.
    seen: Option<u64>,
    /// A commit was saved but its snapshot has not come back yet.
    awaiting_echo: bool,
}

impl PartSync {
    fn at(revision: u64) -> Self {
        Self {
            seen: Some(revision),
            awaiting_echo: false,
        }
    }

    /// Whether `incoming` at `revision` should replace `current`. While a
    /// commit is awaiting its echo, snapshots that do not match it are older
    /// than the commit and are skipped.
    fn should_take<T: PartialEq>(&mut self, revision: u64, current: &T, incoming: &T) -> bool {
        if self.seen.is_some_and(|seen| revision <= seen) {
            return false;
        }
        self.seen = Some(revision);
        if self.awaiting_echo {
            if current != incoming {
                return false;
            }
            self.awaiting_echo = false;
        }
        true
    }

    fn committed<T: PartialEq>(revision: u64, committed: &T, live: &T) -> Self {
        Self {
            seen: Some(revision),
            awaiting_echo: committed != live,
        }
    }
}

impl DraftEditor {
    pub fn new(view: &SiteView) -> Self {
        Self {
            content: view.content.clone(),
            theme: view.theme.clone(),
            dirty: false,
            pulled_at: Utc::now(),
            content_sync: PartSync::at(view.content_revision()),
            theme_sync: PartSync::at(view.theme_revision()),
        }
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    pub fn theme(&self) -> &ThemeSettings {
        &self.theme
    }

    /// Whether there are edits not yet committed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// When the draft last took the authoritative value.
    pub fn pulled_at(&self) -> DateTime<Utc> {
        self.pulled_at
    }

    /// Whether the draft holds something other than `view`.
    pub fn differs_from(&self, view: &SiteView) -> bool {
        *self.content != *view.content || *self.theme != *view.theme
    }

    /// Takes the authoritative value unless there are uncommitted edits.
    ///
    /// Content and theme follow separately: each is taken only when `view`
    /// holds a snapshot of it newer than the last one considered. After a
    /// commit, a part ignores snapshots until its own echo comes back.
    /// Returns whether anything was taken.
    pub fn sync_from(&mut self, view: &SiteView) -> bool {
        if self.dirty {
            return false;
        }
        let take_content = self.content_sync.should_take(
            view.content_revision(),
            &*self.content,
            &*view.content,
        );
        let take_theme =
            self.theme_sync
                .should_take(view.theme_revision(), &*self.theme, &*view.theme);
        if take_content {
            self.content = view.content.clone();
        }
        if take_theme {
            self.theme = view.theme.clone();
        }
        if !take_content && !take_theme {
            return false;
        }
        self.pulled_at = Utc::now();
        true
    }

    /// Discards every edit and takes the authoritative value.
    pub fn reset_from(&mut self, view: &SiteView) {
        self.content = view.content.clone();
        self.theme = view.theme.clone();
        self.dirty = false;
        self.pulled_at = Utc::now();
        self.content_sync = PartSync::at(view.content_revision());
        self.theme_sync = PartSync::at(view.theme_revision());
    }

    pub fn edit_content<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut ContentState),
    {
        edit(Arc::make_mut(&mut self.content));
        self.dirty = true;
    }

    pub fn edit_theme<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut ThemeSettings),
    {
        edit(Arc::make_mut(&mut self.theme));
        self.dirty = true;
    }

    pub fn set_field(&mut self, field: ContentField, value: &str) -> Result<(), DraftError> {
        let mut content = (*self.content).clone();
        field.apply(&mut content, value)?;
        self.content = Arc::new(content);
        self.dirty = true;
        Ok(())
    }

    pub fn set_theme_field(&mut self, field: ThemeField, value: &str) -> Result<(), DraftError> {
        let mut theme = (*self.theme).clone();
        field.apply(&mut theme, value)?;
        self.theme = Arc::new(theme);
        self.dirty = true;
        Ok(())
    }

    pub fn set_icon(&mut self, button: FloatingButton, setting: IconSetting) {
        self.edit_content(|content| *content.floating_buttons.get_mut(button) = setting);
    }

    /// Editable view over one list of records, chosen by `select`:
    ///
    /// ```ignore
    /// draft.collection(|c| &mut c.header_links).remove_by_id("l2")?;
    /// ```
    pub fn collection<T, F>(&mut self, select: F) -> Collection<'_, T>
    where
        T: Record,
        F: FnOnce(&mut ContentState) -> &mut Vec<T>,
    {
        let items = select(Arc::make_mut(&mut self.content));
        Collection::new(items, &mut self.dirty)
    }

    pub fn services(&mut self) -> Collection<'_, Service> {
        self.collection(|c| &mut c.services)
    }

    pub fn projects(&mut self) -> Collection<'_, Project> {
        self.collection(|c| &mut c.latest_projects.projects)
    }

    /// Adds a project. Its category label is trimmed; a label no other
    /// project uses starts a new category.
    pub fn add_project(&mut self, mut project: Project) -> Result<RecordId, DraftError> {
        project.category = category_label(&project.category)?;
        Ok(self.projects().add(project))
    }

    pub fn set_project_category(&mut self, id: &str, category: &str) -> Result<(), DraftError> {
        let label = category_label(category)?;
        self.projects().update_by_id(id, |p| p.category = label)
    }

    /// Categories in use by the draft's projects.
    pub fn categories(&self) -> Vec<String> {
        self.content.project_categories()
    }

    /// Saves the draft through `sync`.
    ///
    /// On success the draft is clean and keeps the committed value; the
    /// store's echo may arrive after the save resolves. On failure it keeps
    /// every edit and stays dirty.
    pub async fn commit(
        &mut self,
        sync: &ContentSynchronizer,
        session: Option<&Session>,
    ) -> Result<(), SaveError> {
        sync.save(session, &self.content, &self.theme).await?;
        self.dirty = false;
        let view = sync.view();
        self.content_sync =
            PartSync::committed(view.content_revision(), &*self.content, &*view.content);
        self.theme_sync = PartSync::committed(view.theme_revision(), &*self.theme, &*view.theme);
        Ok(())
    }

    /// Serializable form, for keeping a draft between runs.
    pub fn to_stored(&self) -> StoredDraft {
        StoredDraft {
            content: (*self.content).clone(),
            theme: (*self.theme).clone(),
            dirty: self.dirty,
            pulled_at: self.pulled_at,
        }
    }

    pub fn from_stored(stored: StoredDraft) -> Self {
        Self {
            content: Arc::new(stored.content),
            theme: Arc::new(stored.theme),
            dirty: stored.dirty,
            pulled_at: stored.pulled_at,
            content_sync: PartSync::default(),
            theme_sync: PartSync::default(),
        }
    }
}

fn category_label(category: &str) -> Result<String, DraftError> {
    let label = category.trim();
    if label.is_empty() {
        return Err(DraftError::EmptyCategory);
    }
    Ok(label.to_string())
}

/// A draft as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDraft {
    pub content: ContentState,
    pub theme: ThemeSettings,
    pub dirty: bool,
    pub pulled_at: DateTime<Utc>,
}
