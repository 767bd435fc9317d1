//! Error types for the persistence layer

use std::path::PathBuf;
use thiserror::Error;

/// Result type for persistence operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while reading or writing persisted values
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key contains characters that cannot be used as a file name
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// Failed to read a stored value
    #[error("Failed to read '{key}' at {path}: {source}")]
    ReadError {
        key: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a stored value
    #[error("Failed to write '{key}' at {path}: {source}")]
    WriteError {
        key: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create the storage directory
    #[error("Failed to create storage directory at {path}: {source}")]
    DirectoryCreationError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Stored value is not valid JSON for the requested type
    #[error("Failed to decode '{key}': {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },

    /// Value could not be encoded
    #[error("Failed to encode '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    /// Backend refused the operation (full, read-only, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Key the failed operation was addressing, when known
    pub fn key(&self) -> Option<&str> {
        match self {
            StorageError::InvalidKey(key) => Some(key),
            StorageError::ReadError { key, .. }
            | StorageError::WriteError { key, .. }
            | StorageError::Decode { key, .. }
            | StorageError::Encode { key, .. } => Some(key),
            StorageError::DirectoryCreationError { .. } | StorageError::Unavailable(_) => None,
        }
    }
}
