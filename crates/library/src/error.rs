use bookfinder_core::AppError;
use bookfinder_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("No user is signed in")]
    NotSignedIn,

    #[error("{0}")]
    InvalidProfile(String),
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::Storage(StorageError::Decode { key, source }) => {
                AppError::CacheCorrupted {
                    key,
                    reason: source.to_string(),
                }
            }
            LibraryError::Storage(e) => {
                let key = e.key().unwrap_or("store").to_string();
                AppError::persistence(key, e)
            }
            account @ (LibraryError::NotSignedIn | LibraryError::InvalidProfile(_)) => {
                AppError::Account {
                    reason: account.to_string(),
                }
            }
        }
    }
}

pub type LibraryResult<T> = std::result::Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bookfinder_core::RecoveryAction;
    use bookfinder_storage::{MemoryBackend, PersistentStore, StorageBackend};

    #[test]
    fn test_decode_failure_is_corruption() {
        let backend = MemoryBackend::new();
        backend.write("favorites", "{not json").unwrap();
        let store = PersistentStore::new(backend);

        let decode = store.get::<Vec<String>>("favorites").unwrap_err();
        let err: AppError = LibraryError::from(decode).into();

        assert!(matches!(err, AppError::CacheCorrupted { ref key, .. } if key == "favorites"));
        assert_eq!(err.recovery_action(), RecoveryAction::ContinueInMemory);
    }

    #[test]
    fn test_account_errors_keep_their_text() {
        let err: AppError = LibraryError::InvalidProfile("'ada' is not an email address".to_string()).into();
        assert_eq!(err.user_message(), "'ada' is not an email address.");

        let err: AppError = LibraryError::NotSignedIn.into();
        assert_eq!(err.user_message(), "No user is signed in.");
    }
}
