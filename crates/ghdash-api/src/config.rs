//! # Configuration Persistence
//!
//! Load application settings from disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::client::{ClientSettings, DEFAULT_API_URL};
use crate::storage::{FileStorage, StorageResult};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the GitHub REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// `User-Agent` sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Token storage file. Defaults to `<config_dir>/ghdash/storage.json`.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_user_agent() -> String {
    ClientSettings::default().user_agent
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            storage_path: None,
        }
    }
}

impl Config {
    /// Returns the config file path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ghdash").join("config.json"))
    }

    /// Loads configuration from the default location, or returns defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::warn!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Loads configuration from `path`, or returns defaults if it is
    /// missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(?path, "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Settings for building a [`GitHubClient`](crate::GitHubClient).
    #[must_use]
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            api_url: self.api_url.clone(),
            user_agent: self.user_agent.clone(),
        }
    }

    /// The token storage this configuration points at.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoConfigDir`](crate::StorageError::NoConfigDir)
    /// if no path is configured and the platform has no config directory.
    pub fn storage(&self) -> StorageResult<FileStorage> {
        match &self.storage_path {
            Some(path) => Ok(FileStorage::new(path)),
            None => FileStorage::default_location(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json"));

        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, "https://api.github.com");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "api_url": "https://ghe.example.com/api/v3" }"#).unwrap();

        let config = Config::load_from(&path);

        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
        assert!(config.user_agent.starts_with("ghdash/"));
        assert!(config.storage_path.is_none());
    }

    #[test]
    fn test_load_corrupt_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_storage_path_override() {
        let config = Config {
            storage_path: Some(PathBuf::from("/tmp/ghdash-test/storage.json")),
            ..Config::default()
        };

        let storage = config.storage().unwrap();
        assert_eq!(
            storage.path(),
            Path::new("/tmp/ghdash-test/storage.json")
        );
    }

    #[test]
    fn test_client_settings() {
        let config = Config {
            api_url: "http://127.0.0.1:9999".to_string(),
            ..Config::default()
        };

        let settings = config.client_settings();
        assert_eq!(settings.api_url, "http://127.0.0.1:9999");
        assert_eq!(settings.user_agent, config.user_agent);
    }
}
