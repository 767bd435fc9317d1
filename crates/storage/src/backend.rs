//! Raw key-value backends
//!
//! Backends move already-encoded JSON strings around; typing happens one
//! level up in `PersistentStore`.

use crate::{StorageError, StorageResult};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// A key-value store holding JSON strings
pub trait StorageBackend: Send + Sync {
    /// Reads the raw value for `key`, `None` if absent
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the raw value for `key`
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`; removing an absent key succeeds
    fn delete(&self, key: &str) -> StorageResult<()>;
}

/// File-per-key backend rooted in a data directory
///
/// Writes go to a temporary file in the same directory and are renamed
/// over the target, so a value file is never left half written.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Opens (and creates if needed) a backend rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| StorageError::DirectoryCreationError {
                path: root.clone(),
                source: e,
            })?;
            log::info!("Created data directory: {}", root.display());
        }
        Ok(Self { root })
    }

    /// Directory holding the value files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StorageError::ReadError {
                key: key.to_string(),
                path,
                source: e,
            })
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        let write_err = |source: std::io::Error| StorageError::WriteError {
            key: key.to_string(),
            path: path.clone(),
            source,
        };

        let mut temp_file = NamedTempFile::new_in(&self.root).map_err(write_err)?;
        temp_file.write_all(value.as_bytes()).map_err(write_err)?;
        temp_file.flush().map_err(write_err)?;
        temp_file
            .persist(&path)
            .map_err(|e| write_err(e.error))?;

        log::debug!("Persisted '{}' to {}", key, path.display());
        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::WriteError {
                key: key.to_string(),
                path,
                source: e,
            }),
        }
    }
}

/// In-memory backend for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.values().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_backend() -> (TempDir, FileBackend) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let backend = FileBackend::open(temp_dir.path()).expect("Failed to open backend");
        (temp_dir, backend)
    }

    #[test]
    fn test_read_missing_key_is_none() {
        let (_temp_dir, backend) = setup_backend();
        assert_eq!(backend.read("favorites").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let (_temp_dir, backend) = setup_backend();
        backend.write("theme", "\"dark\"").unwrap();
        assert_eq!(backend.read("theme").unwrap().as_deref(), Some("\"dark\""));
        assert!(backend.root().join("theme.json").exists());
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let (_temp_dir, backend) = setup_backend();
        backend.write("quote_date", "\"2026-01-01\"").unwrap();
        backend.write("quote_date", "\"2026-01-02\"").unwrap();
        assert_eq!(
            backend.read("quote_date").unwrap().as_deref(),
            Some("\"2026-01-02\"")
        );
    }

    #[test]
    fn test_delete_missing_key_succeeds() {
        let (_temp_dir, backend) = setup_backend();
        assert!(backend.delete("user").is_ok());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let (_temp_dir, backend) = setup_backend();
        assert!(matches!(
            backend.write("../escape", "1"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(backend.read(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("a").join("b");
        let backend = FileBackend::open(&root).unwrap();
        backend.write("user", "{}").unwrap();
        assert!(root.join("user.json").exists());
    }

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();
        backend.write("k", "1").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("1"));
        backend.delete("k").unwrap();
        assert_eq!(backend.read("k").unwrap(), None);
    }
}
