//! The local draft, kept as JSON between CLI runs.

use sitecms_core::{DraftEditor, StoredDraft};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum DraftFileError {
    Io(PathBuf, io::Error),
    Json(PathBuf, serde_json::Error),
    Missing(PathBuf),
}

impl std::fmt::Display for DraftFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftFileError::Io(path, e) => write!(f, "I/O error for {}: {}", path.display(), e),
            DraftFileError::Json(path, e) => {
                write!(f, "Failed to parse draft {}: {}", path.display(), e)
            }
            DraftFileError::Missing(_) => {
                write!(f, "No local draft. Run `sitecms draft pull` first")
            }
        }
    }
}

impl std::error::Error for DraftFileError {}

/// Loads the draft, or `None` if there is none.
pub fn load(path: &Path) -> Result<Option<DraftEditor>, DraftFileError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(DraftFileError::Io(path.to_path_buf(), e)),
    };
    let stored: StoredDraft =
        serde_json::from_slice(&bytes).map_err(|e| DraftFileError::Json(path.to_path_buf(), e))?;
    Ok(Some(DraftEditor::from_stored(stored)))
}

/// Loads the draft, failing if there is none.
pub fn require(path: &Path) -> Result<DraftEditor, DraftFileError> {
    load(path)?.ok_or_else(|| DraftFileError::Missing(path.to_path_buf()))
}

pub fn save(path: &Path, draft: &DraftEditor) -> Result<(), DraftFileError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| DraftFileError::Io(parent.to_path_buf(), e))?;
    }
    let json = serde_json::to_vec_pretty(&draft.to_stored())
        .map_err(|e| DraftFileError::Json(path.to_path_buf(), e))?;

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, json).map_err(|e| DraftFileError::Io(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path).map_err(|e| DraftFileError::Io(path.to_path_buf(), e))
}

/// Deletes the draft. Returns whether there was one.
pub fn remove(path: &Path) -> Result<bool, DraftFileError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(DraftFileError::Io(path.to_path_buf(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecms_core::{ContentField, ContentState, ThemeSettings};
    use tempfile::TempDir;

    fn fresh_draft() -> DraftEditor {
        DraftEditor::from_stored(StoredDraft {
            content: ContentState::default(),
            theme: ThemeSettings::default(),
            dirty: false,
            pulled_at: chrono::Utc::now(),
        })
    }

    #[test]
    fn test_missing_draft() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("draft.json");

        assert!(load(&path).unwrap().is_none());
        assert!(matches!(require(&path), Err(DraftFileError::Missing(_))));
        assert!(!remove(&path).unwrap());
    }

    #[test]
    fn test_save_keeps_edits_and_dirty_flag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("draft.json");

        let mut draft = fresh_draft();
        draft.set_field(ContentField::SiteName, "Acme").unwrap();
        save(&path, &draft).unwrap();

        let loaded = require(&path).unwrap();
        assert!(loaded.is_dirty());
        assert_eq!(loaded.content().site_name, "Acme");
        assert_eq!(loaded.pulled_at(), draft.pulled_at());

        assert!(remove(&path).unwrap());
        assert!(load(&path).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_draft() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("draft.json");
        std::fs::write(&path, "{").unwrap();

        assert!(matches!(load(&path), Err(DraftFileError::Json(_, _))));
    }
}
