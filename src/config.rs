use serde::{Deserialize, Serialize};
use sitecms_core::store::{PathError, StorePaths, DEFAULT_NAMESPACE};
use sitecms_core::Session;
use std::path::PathBuf;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Connection to the content server
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    /// Server URL (e.g., "http://localhost:8080" or "wss://cms.example.com")
    pub server_url: Option<String>,
    /// API key, required to commit drafts. Never printed.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl ServerConfig {
    /// Returns true if a server URL is set
    pub fn is_configured(&self) -> bool {
        self.server_url.is_some()
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Where the local draft is kept
    pub data_dir: ConfigValue<PathBuf>,
    /// Store namespace holding the site
    pub namespace: ConfigValue<String>,
    /// Name recorded with saves
    pub principal: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Server connection
    pub server: ServerConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    namespace: Option<String>,
    principal: Option<String>,
    server: Option<ServerConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut namespace = ConfigValue::new(DEFAULT_NAMESPACE.to_string(), ConfigSource::Default);
        let mut principal = ConfigValue::new("admin".to_string(), ConfigSource::Default);
        let mut config_file = None;
        let mut server = ServerConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(ns) = file_config.namespace {
                namespace = ConfigValue::new(ns, ConfigSource::File);
            }
            if let Some(name) = file_config.principal {
                principal = ConfigValue::new(name, ConfigSource::File);
            }
            if let Some(server_config) = file_config.server {
                server = server_config;
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("SITECMS_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(ns) = std::env::var("SITECMS_NAMESPACE") {
            namespace = ConfigValue::new(ns, ConfigSource::Environment);
        }
        if let Ok(name) = std::env::var("SITECMS_PRINCIPAL") {
            principal = ConfigValue::new(name, ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("SITECMS_SERVER_URL") {
            server.server_url = Some(url);
        }
        if let Ok(key) = std::env::var("SITECMS_API_KEY") {
            server.api_key = Some(key);
        }

        Ok(Self {
            data_dir,
            namespace,
            principal,
            config_file,
            server,
        })
    }

    /// Store paths for the configured namespace
    pub fn store_paths(&self) -> Result<StorePaths, PathError> {
        StorePaths::under(&self.namespace.value)
    }

    /// Session for writes, if an API key is configured
    pub fn session(&self) -> Option<Session> {
        self.server
            .api_key
            .as_ref()
            .map(|key| Session::new(self.principal.value.clone(), key.clone()))
    }

    /// Where the local draft is stored
    pub fn draft_path(&self) -> PathBuf {
        self.data_dir.value.join("draft.json")
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/sitecms/
    /// - macOS: ~/Library/Application Support/sitecms/
    /// - Windows: %APPDATA%/sitecms/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sitecms")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/sitecms/
    /// - macOS: ~/Library/Application Support/sitecms/
    /// - Windows: %APPDATA%/sitecms/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sitecms")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
