//! Error types and recovery strategies for BookFinder
//!
//! Nothing in the client layer is fatal. Every error falls in one of three tiers:
//! - **Suppressed**: invalid input that is dropped without telling the user
//! - **Informational**: not a failure, but worth a neutral notification
//! - **Recoverable**: the operation failed; previous state is kept and the
//!   user is told (or, for persistence, the in-memory change still applies)
//!
//! Each error includes a recovery action so callers can react without
//! matching on every variant.

use std::fmt;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Drop the request silently
    Ignore,
    /// Show a neutral notification, nothing failed
    NotifyUser,
    /// Leave visible state untouched and show a destructive notification
    KeepPreviousState,
    /// Apply the change in memory even though it could not be persisted
    ContinueInMemory,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ignore => write!(f, "Ignoring request"),
            Self::NotifyUser => write!(f, "Notifying user"),
            Self::KeepPreviousState => write!(f, "Keeping previous state"),
            Self::ContinueInMemory => write!(f, "Continuing in memory"),
        }
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Not surfaced at all
    Suppressed,
    /// Surfaced as a neutral notification
    Informational,
    /// Surfaced as a destructive notification or logged, state preserved
    Recoverable,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suppressed => write!(f, "Suppressed"),
            Self::Informational => write!(f, "Informational"),
            Self::Recoverable => write!(f, "Recoverable"),
        }
    }
}

/// Main error type for BookFinder
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Validation =====
    /// Search issued with neither a query nor a filter
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    // ===== Search outcome =====
    /// The catalog answered with zero records
    #[error("No results for {query}")]
    NoResults { query: String },

    // ===== Network Errors =====
    /// Network request failed
    #[error("Network error: {message}")]
    NetworkError { message: String },

    /// Network timeout
    #[error("Network timeout after {seconds}s: {operation}")]
    NetworkTimeout { operation: String, seconds: u64 },

    /// Catalog service could not be reached
    #[error("Content source '{provider}' unavailable: {reason}")]
    ContentSourceUnavailable { provider: String, reason: String },

    /// Catalog answered with something that is not a search document
    #[error("Invalid response from {provider}: {details}")]
    InvalidContentResponse { provider: String, details: String },

    // ===== Persistence Errors =====
    /// A persisted key could not be written or removed
    #[error("Failed to persist '{key}': {reason}")]
    PersistenceFailed { key: String, reason: String },

    /// A persisted value could not be decoded
    #[error("Stored value for '{key}' is corrupted: {reason}")]
    CacheCorrupted { key: String, reason: String },

    // ===== Account Errors =====
    /// The local user record cannot take the requested change
    #[error("Account: {reason}")]
    Account { reason: String },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl AppError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidQuery { .. } => ErrorSeverity::Suppressed,
            Self::NoResults { .. } => ErrorSeverity::Informational,
            _ => ErrorSeverity::Recoverable,
        }
    }

    /// Returns the recommended recovery action for this error
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::InvalidQuery { .. } => RecoveryAction::Ignore,
            Self::NoResults { .. } => RecoveryAction::NotifyUser,

            Self::NetworkError { .. }
            | Self::NetworkTimeout { .. }
            | Self::ContentSourceUnavailable { .. }
            | Self::InvalidContentResponse { .. }
            | Self::Account { .. }
            | Self::InternalError { .. } => RecoveryAction::KeepPreviousState,

            Self::PersistenceFailed { .. } | Self::CacheCorrupted { .. } => {
                RecoveryAction::ContinueInMemory
            }
        }
    }

    /// Returns a user-friendly error message suitable for display in the UI
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidQuery { .. } => "Enter a search term or a filter.".to_string(),
            Self::NoResults { .. } => "Try adjusting your search terms or filters.".to_string(),

            Self::NetworkError { .. }
            | Self::NetworkTimeout { .. }
            | Self::ContentSourceUnavailable { .. }
            | Self::InvalidContentResponse { .. } => {
                "There was an error searching for books. Please try again.".to_string()
            }

            Self::PersistenceFailed { .. } => {
                "Your changes could not be saved and will be lost on restart.".to_string()
            }
            Self::CacheCorrupted { .. } => "Saved data was unreadable and was reset.".to_string(),

            Self::Account { reason } => format!("{}.", reason),

            Self::InternalError { .. } => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }

    /// Returns true if the user should see a destructive notification
    pub fn is_user_visible_failure(&self) -> bool {
        self.recovery_action() == RecoveryAction::KeepPreviousState
    }

    /// Helper to create a persistence error
    pub fn persistence(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::PersistenceFailed {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
