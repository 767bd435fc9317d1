//! Domain types for BookFinder
//!
//! - `book`: catalog records and cover URL derivation
//! - `filters`: structured search filters
//! - `history`: search history items and age formatting
//! - `quote`: daily quote records
//! - `common`: timestamps

mod book;
mod common;
mod filters;
mod history;
mod quote;

pub use book::{Book, CoverSize, COVERS_BASE_URL};
pub use common::Timestamp;
pub use filters::{FilterField, SearchFilters};
pub use history::{format_age, SearchHistoryItem};
pub use quote::{Quote, QuoteRecord};
