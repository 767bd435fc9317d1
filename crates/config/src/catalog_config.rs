//! Remote catalog configuration section

use crate::validation::{check, ConfigSection};
use crate::ValidationError;
use serde::{Deserialize, Serialize};

/// Sort orders the catalog accepts for the trending request
const TRENDING_SORTS: [&str; 4] = ["rating", "new", "old", "random"];

/// Where and how the book catalog is queried
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog service root; `/search.json` is appended
    pub base_url: String,

    /// Cover image service root
    pub covers_base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Page size for user-initiated searches
    pub search_limit: usize,

    /// Page size for the startup trending request
    pub trending_limit: usize,

    /// Subject filter of the trending request
    pub trending_subject: String,

    /// Sort order of the trending request
    pub trending_sort: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
            covers_base_url: "https://covers.openlibrary.org".to_string(),
            timeout_secs: 30,
            search_limit: 24,
            trending_limit: 6,
            trending_subject: "fiction".to_string(),
            trending_sort: "rating".to_string(),
        }
    }
}

impl ConfigSection for CatalogConfig {
    const SECTION: &'static str = "catalog";

    fn problems(&self) -> Vec<ValidationError> {
        [
            check::http_url("catalog.base_url", &self.base_url),
            check::http_url("catalog.covers_base_url", &self.covers_base_url),
            check::within("catalog.timeout_secs", self.timeout_secs, 1..=300),
            check::within("catalog.search_limit", self.search_limit, 1..=100),
            check::within("catalog.trending_limit", self.trending_limit, 1..=100),
            check::non_blank("catalog.trending_subject", &self.trending_subject),
            check::one_of("catalog.trending_sort", &self.trending_sort, &TRENDING_SORTS),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
