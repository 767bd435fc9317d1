//! Remote book catalogs
//!
//! A `CatalogSource` answers a `SearchRequest` with a list of `Book`s.
//! `OpenLibrarySource` is the production implementation; tests substitute
//! their own.

mod open_library;
mod traits;

pub use open_library::{parse_search_response, OpenLibrarySource};
pub use traits::{CatalogSource, SearchRequest, SourceMetadata};

use bookfinder_core::AppError;
use std::fmt;

/// Result type for content source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors from content sources
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Network error or non-success status
    NetworkError(String),
    /// Request did not complete within the timeout (seconds)
    Timeout(u64),
    /// Response body is not a search document
    ParseError(String),
    /// Invalid query
    InvalidQuery(String),
    /// Rate limited
    RateLimited,
    /// Source unavailable
    Unavailable(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NetworkError(e) => write!(f, "Network error: {}", e),
            SourceError::Timeout(secs) => write!(f, "Timed out after {}s", secs),
            SourceError::ParseError(e) => write!(f, "Parse error: {}", e),
            SourceError::InvalidQuery(e) => write!(f, "Invalid query: {}", e),
            SourceError::RateLimited => write!(f, "Rate limited"),
            SourceError::Unavailable(e) => write!(f, "Source unavailable: {}", e),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NetworkError(message) => AppError::NetworkError { message },
            SourceError::Timeout(seconds) => AppError::NetworkTimeout {
                operation: "catalog search".to_string(),
                seconds,
            },
            SourceError::ParseError(details) => AppError::InvalidContentResponse {
                provider: "catalog".to_string(),
                details,
            },
            SourceError::InvalidQuery(reason) => AppError::InvalidQuery { reason },
            SourceError::RateLimited => AppError::ContentSourceUnavailable {
                provider: "catalog".to_string(),
                reason: "rate limited".to_string(),
            },
            SourceError::Unavailable(reason) => AppError::ContentSourceUnavailable {
                provider: "catalog".to_string(),
                reason,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookfinder_core::{ErrorSeverity, RecoveryAction};

    #[test]
    fn test_error_display() {
        let err = SourceError::Timeout(30);
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn test_invalid_query_is_suppressed() {
        let err: AppError = SourceError::InvalidQuery("Empty query".to_string()).into();
        assert_eq!(err.severity(), ErrorSeverity::Suppressed);
    }

    #[test]
    fn test_transport_failures_keep_previous_state() {
        let errors = [
            SourceError::NetworkError("HTTP 500".to_string()),
            SourceError::Timeout(30),
            SourceError::ParseError("expected object".to_string()),
            SourceError::RateLimited,
        ];

        for err in errors {
            let app: AppError = err.into();
            assert_eq!(app.recovery_action(), RecoveryAction::KeepPreviousState);
        }
    }
}
