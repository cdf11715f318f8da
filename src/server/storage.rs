//! Server-side value storage.
//!
//! Each store path maps to one JSON file under the data directory:
//! ```text
//! <DATA_DIR>/
//!   site/
//!     content.json
//!     theme.json
//! ```
//!
//! Writes go to a temp file first and are renamed into place.

use serde_json::Value;
use sitecms_core::StorePath;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

/// Errors that can occur during server storage operations.
#[derive(Debug)]
pub enum ServerStorageError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// Stored file is not valid JSON.
    JsonError(PathBuf, serde_json::Error),
}

impl std::fmt::Display for ServerStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerStorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            ServerStorageError::JsonError(path, e) => {
                write!(f, "Failed to parse {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ServerStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerStorageError::IoError(_, e) => Some(e),
            ServerStorageError::JsonError(_, e) => Some(e),
        }
    }
}

/// Server-side storage for whole values at store paths.
#[derive(Debug, Clone)]
pub struct ServerStorage {
    data_dir: PathBuf,
}

impl ServerStorage {
    /// Creates a new server storage instance.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the file holding the value at `path`.
    ///
    /// `StorePath` segments never contain separators or leading dots, so the
    /// result always stays inside the data directory.
    fn file_path(&self, path: &StorePath) -> PathBuf {
        let mut file = self.data_dir.clone();
        file.extend(path.segments());
        file.set_extension("json");
        file
    }

    /// Loads the value at `path`.
    ///
    /// Returns `Ok(None)` if nothing has been written yet.
    pub fn load(&self, path: &StorePath) -> Result<Option<Value>, ServerStorageError> {
        let file = self.file_path(path);

        match fs::read(&file) {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| ServerStorageError::JsonError(file, e))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ServerStorageError::IoError(file, e)),
        }
    }

    /// Replaces the value at `path`. Saving `null` deletes it.
    pub fn save(&self, path: &StorePath, value: &Value) -> Result<(), ServerStorageError> {
        let file = self.file_path(path);

        if value.is_null() {
            return match fs::remove_file(&file) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(ServerStorageError::IoError(file, e)),
            };
        }

        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ServerStorageError::IoError(parent.to_path_buf(), e))?;
        }

        let bytes =
            serde_json::to_vec(value).map_err(|e| ServerStorageError::JsonError(file.clone(), e))?;

        // Write atomically using temp file + rename
        let temp_path = file.with_extension("json.tmp");

        let mut handle = File::create(&temp_path)
            .map_err(|e| ServerStorageError::IoError(temp_path.clone(), e))?;
        handle
            .write_all(&bytes)
            .map_err(|e| ServerStorageError::IoError(temp_path.clone(), e))?;
        handle
            .sync_all()
            .map_err(|e| ServerStorageError::IoError(temp_path.clone(), e))?;

        // Rename to final path (atomic on most filesystems)
        fs::rename(&temp_path, &file).map_err(|e| ServerStorageError::IoError(file, e))?;

        Ok(())
    }

    /// Checks if a value exists at `path`.
    pub fn exists(&self, path: &StorePath) -> bool {
        self.file_path(path).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (ServerStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = ServerStorage::new(temp_dir.path());
        (storage, temp_dir)
    }

    fn path(p: &str) -> StorePath {
        StorePath::parse(p).unwrap()
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let (storage, _temp) = setup();
        assert!(storage.load(&path("site/content")).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (storage, _temp) = setup();
        let value = json!({"siteName": "Acme", "services": [{"id": "s1"}]});

        storage.save(&path("site/content"), &value).unwrap();

        assert_eq!(storage.load(&path("site/content")).unwrap(), Some(value));
    }

    #[test]
    fn test_paths_are_isolated() {
        let (storage, _temp) = setup();

        storage.save(&path("site/content"), &json!({"n": 1})).unwrap();
        storage.save(&path("site/theme"), &json!({"n": 2})).unwrap();
        storage.save(&path("staging/content"), &json!({"n": 3})).unwrap();

        assert_eq!(storage.load(&path("site/content")).unwrap(), Some(json!({"n": 1})));
        assert_eq!(storage.load(&path("site/theme")).unwrap(), Some(json!({"n": 2})));
        assert_eq!(storage.load(&path("staging/content")).unwrap(), Some(json!({"n": 3})));
    }

    #[test]
    fn test_overwrite_existing() {
        let (storage, _temp) = setup();

        storage.save(&path("site/theme"), &json!({"version": 1})).unwrap();
        storage.save(&path("site/theme"), &json!({"version": 2})).unwrap();

        assert_eq!(
            storage.load(&path("site/theme")).unwrap(),
            Some(json!({"version": 2}))
        );
    }

    #[test]
    fn test_save_null_deletes() {
        let (storage, _temp) = setup();
        let p = path("site/theme");

        storage.save(&p, &json!({})).unwrap();
        assert!(storage.exists(&p));
        storage.save(&p, &Value::Null).unwrap();
        assert!(!storage.exists(&p));
        // Deleting again is fine.
        storage.save(&p, &Value::Null).unwrap();
    }

    #[test]
    fn test_directory_structure() {
        let (storage, temp) = setup();

        storage.save(&path("site/content"), &json!({})).unwrap();

        let expected = temp.path().join("site").join("content.json");
        assert!(expected.exists());
        assert!(!temp.path().join("site").join("content.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let (storage, temp) = setup();
        fs::create_dir_all(temp.path().join("site")).unwrap();
        fs::write(temp.path().join("site").join("content.json"), b"{not json").unwrap();

        let result = storage.load(&path("site/content"));
        assert!(matches!(result, Err(ServerStorageError::JsonError(_, _))));
    }
}
