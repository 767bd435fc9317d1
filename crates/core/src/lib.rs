//! Domain types shared by every BookFinder crate
//!
//! Catalog records, search filters, history items, quotes and the error
//! taxonomy used to decide how failures reach the user.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, ErrorSeverity, RecoveryAction, Result};
pub use types::{
    format_age, Book, CoverSize, FilterField, Quote, QuoteRecord, SearchFilters,
    SearchHistoryItem, Timestamp, COVERS_BASE_URL,
};
