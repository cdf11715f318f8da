//! API keys for authenticated writes.
//!
//! Keys live in the server config file:
//!
//! ```yaml
//! api_keys:
//!   - key: "your-secret-key-here"
//!     principal: "editor"
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One configured API key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyEntry {
    pub key: String,
    /// Who writes with this key
    pub principal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Server config file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyFile {
    #[serde(default)]
    pub api_keys: Vec<ApiKeyEntry>,
}

#[derive(Debug)]
pub enum KeyFileError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, serde_yaml::Error),
    DuplicateKey,
}

impl std::fmt::Display for KeyFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyFileError::Io(path, e) => write!(f, "I/O error for {}: {}", path.display(), e),
            KeyFileError::Parse(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            KeyFileError::DuplicateKey => write!(f, "API key is already registered"),
        }
    }
}

impl std::error::Error for KeyFileError {}

impl KeyFile {
    /// Reads the key file. A missing file has no keys.
    pub fn read(path: &Path) -> Result<Self, KeyFileError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_yaml::from_str(&contents)
                .map_err(|e| KeyFileError::Parse(path.to_path_buf(), e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(KeyFileError::Io(path.to_path_buf(), e)),
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), KeyFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| KeyFileError::Io(parent.to_path_buf(), e))?;
        }
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| KeyFileError::Parse(path.to_path_buf(), e))?;
        std::fs::write(path, yaml).map_err(|e| KeyFileError::Io(path.to_path_buf(), e))
    }

    /// Registers a key for `principal`.
    pub fn add(&mut self, principal: &str, key: String) -> Result<&ApiKeyEntry, KeyFileError> {
        if self.api_keys.iter().any(|entry| entry.key == key) {
            return Err(KeyFileError::DuplicateKey);
        }
        self.api_keys.push(ApiKeyEntry {
            key,
            principal: principal.to_string(),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
        });
        Ok(&self.api_keys[self.api_keys.len() - 1])
    }

    /// Drops every key belonging to `principal`, returning how many went.
    pub fn remove_principal(&mut self, principal: &str) -> usize {
        let before = self.api_keys.len();
        self.api_keys.retain(|entry| entry.principal != principal);
        before - self.api_keys.len()
    }
}

/// API key store - maps key -> principal
#[derive(Debug, Clone, Default)]
pub struct ApiKeyStore {
    keys: HashMap<String, String>,
}

impl ApiKeyStore {
    pub fn from_entries(entries: impl IntoIterator<Item = ApiKeyEntry>) -> Self {
        let keys = entries
            .into_iter()
            .map(|entry| (entry.key, entry.principal))
            .collect();
        Self { keys }
    }

    /// Load API keys from the config file.
    ///
    /// An unreadable file leaves the store empty so the server still serves
    /// reads.
    pub fn load(config_path: &Path) -> Self {
        match KeyFile::read(config_path) {
            Ok(file) => {
                let store = Self::from_entries(file.api_keys);
                tracing::info!(count = store.len(), "Loaded API keys");
                if store.is_empty() {
                    tracing::warn!("No API keys loaded - all writes will be rejected");
                }
                store
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load API keys");
                tracing::warn!("No API keys loaded - all writes will be rejected");
                Self::default()
            }
        }
    }

    /// Validate an API key and return the associated principal
    pub fn validate(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Generates a random API key (32 bytes, base64url encoded).
pub fn generate_key() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_key_format() {
        let key = generate_key();
        // 32 bytes -> 43 chars in base64url without padding
        assert_eq!(key.len(), 43);
        assert!(key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(key, generate_key());
    }

    #[test]
    fn test_missing_file_has_no_keys() {
        let temp = TempDir::new().unwrap();
        let file = KeyFile::read(&temp.path().join("config.yaml")).unwrap();
        assert!(file.api_keys.is_empty());

        let store = ApiKeyStore::load(&temp.path().join("config.yaml"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_write_then_load_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        let mut file = KeyFile::default();
        file.add("editor", "k1".to_string()).unwrap();
        file.add("owner", "k2".to_string()).unwrap();
        file.write(&path).unwrap();

        let store = ApiKeyStore::load(&path);
        assert_eq!(store.len(), 2);
        assert_eq!(store.validate("k1"), Some("editor"));
        assert_eq!(store.validate("k2"), Some("owner"));
        assert_eq!(store.validate("nope"), None);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut file = KeyFile::default();
        file.add("editor", "k1".to_string()).unwrap();
        let err = file.add("other", "k1".to_string()).unwrap_err();
        assert!(matches!(err, KeyFileError::DuplicateKey));
    }

    #[test]
    fn test_remove_principal() {
        let mut file = KeyFile::default();
        file.add("editor", "k1".to_string()).unwrap();
        file.add("editor", "k2".to_string()).unwrap();
        file.add("owner", "k3".to_string()).unwrap();

        assert_eq!(file.remove_principal("editor"), 2);
        assert_eq!(file.remove_principal("editor"), 0);
        assert_eq!(file.api_keys.len(), 1);
    }

    #[test]
    fn test_hand_written_file_parses() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "api_keys:\n  - key: \"abc\"\n    principal: \"editor\"\n",
        )
        .unwrap();

        let store = ApiKeyStore::load(&path);
        assert_eq!(store.validate("abc"), Some("editor"));
    }

    #[test]
    fn test_invalid_file_loads_empty_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "api_keys: [\n").unwrap();

        assert!(KeyFile::read(&path).is_err());
        assert!(ApiKeyStore::load(&path).is_empty());
    }
}
