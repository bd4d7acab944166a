//! # Token Storage
//!
//! Small string key-value stores used to persist the access token across
//! restarts.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The platform config directory could not be determined.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// Reading or writing the backing file failed.
    #[error("storage I/O error at {}: {source}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file does not contain a JSON object of strings.
    #[error("corrupt storage file {}: {source}", .path.display())]
    Corrupt {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistent string key-value storage.
pub trait TokenStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: TokenStorage + ?Sized> TokenStorage for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Storage backed by a JSON object file on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates storage backed by the file at `path`.
    ///
    /// The file and its parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage in the platform config directory (`<config_dir>/ghdash/storage.json`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoConfigDir`] if the platform exposes no
    /// config directory.
    pub fn default_location() -> StorageResult<Self> {
        dirs::config_dir()
            .map(|p| Self::new(p.join("ghdash").join("storage.json")))
            .ok_or(StorageError::NoConfigDir)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            tracing::debug!(path = ?self.path, "Storage file not found, treating as empty");
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the file contents atomically through a sibling temp file.
    fn write_entries(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.to_path_buf(),
            source,
        })?;

        let contents = serde_json::to_string_pretty(entries).map_err(|source| {
            StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        let io_err = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(parent).map_err(io_err)?;
        tmp.write_all(contents.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        tracing::debug!(path = ?self.path, "Saved storage file");
        Ok(())
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    /// Removes `key`, resetting the file if it cannot be parsed.
    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StorageError::Corrupt { path, source }) => {
                tracing::warn!(?path, error = %source, "Storage file is corrupt, resetting it");
                return self.write_entries(&BTreeMap::new());
            }
            Err(e) => return Err(e),
        };
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// In-process storage; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));

        assert_eq!(storage.get("github_token").unwrap(), None);
    }

    #[test]
    fn test_file_storage_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("storage.json"));

        storage.set("github_token", "ghp_one").unwrap();
        storage.set("other", "kept").unwrap();
        assert_eq!(
            storage.get("github_token").unwrap().as_deref(),
            Some("ghp_one")
        );

        storage.remove("github_token").unwrap();
        assert_eq!(storage.get("github_token").unwrap(), None);
        assert_eq!(storage.get("other").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");

        FileStorage::new(&path).set("github_token", "ghp_two").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get("github_token").unwrap().as_deref(),
            Some("ghp_two")
        );
    }

    #[test]
    fn test_file_storage_remove_missing_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        let storage = FileStorage::new(&path);

        storage.remove("github_token").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStorage::new(&path).get("github_token").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_file_storage_remove_resets_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"github_token": "ghp_trunc"#).unwrap();
        let storage = FileStorage::new(&path);

        storage.remove("github_token").unwrap();

        assert_eq!(storage.get("github_token").unwrap(), None);
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "{}");
    }

    #[test]
    fn test_file_storage_write_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));

        storage.set("github_token", "ghp_one").unwrap();
        storage.set("github_token", "ghp_two").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("storage.json")]);
    }

    #[test]
    fn test_memory_storage_through_arc() {
        let storage = Arc::new(MemoryStorage::new());
        let shared = Arc::clone(&storage);

        shared.set("github_token", "ghp_three").unwrap();
        assert_eq!(
            storage.get("github_token").unwrap().as_deref(),
            Some("ghp_three")
        );

        shared.remove("github_token").unwrap();
        assert_eq!(storage.get("github_token").unwrap(), None);
    }
}
