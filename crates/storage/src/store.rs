//! Typed access to the key-value store

use crate::backend::{FileBackend, MemoryBackend, StorageBackend};
use crate::{StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Typed get/set/remove over a shared backend
///
/// Cloning is cheap; clones share the same backend.
#[derive(Clone)]
pub struct PersistentStore {
    backend: Arc<dyn StorageBackend>,
}

impl PersistentStore {
    /// Wraps an arbitrary backend
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Store backed by files under `dir`
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        Ok(Self::new(FileBackend::open(dir)?))
    }

    /// Store that forgets everything when dropped
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Reads and decodes the value under `key`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let Some(raw) = self.backend.read(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Decode {
                key: key.to_string(),
                source,
            })
    }

    /// Reads `key`, treating absence and any failure as the default value
    ///
    /// Failures are logged; this is the startup path of every cache, which
    /// must come up even when the stored data is unreadable.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("Failed to load '{}': {}, using defaults", key, e);
                T::default()
            }
        }
    }

    /// Encodes and stores `value` under `key`
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.backend.write(key, &raw)
    }

    /// Removes `key`
    pub fn remove(&self, key: &str) -> StorageResult<()> {
        self.backend.delete(key)
    }

    /// True if a value (decodable or not) exists under `key`
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.backend.read(key), Ok(Some(_)))
    }
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore").finish_non_exhaustive()
    }
}
