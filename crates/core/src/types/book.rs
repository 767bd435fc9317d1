//! Catalog book records

use serde::{Deserialize, Serialize};

/// Base URL of the cover image service
pub const COVERS_BASE_URL: &str = "https://covers.openlibrary.org";

/// Cover image size variants served by the cover service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverSize {
    /// Used by result lists and the favorites view
    Medium,
    /// Used by the detail view
    Large,
}

impl CoverSize {
    fn suffix(&self) -> &'static str {
        match self {
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }

    /// Builds the cover URL for `cover_id` under `base_url`
    pub fn url(&self, base_url: &str, cover_id: i64) -> String {
        format!(
            "{}/b/id/{}-{}.jpg",
            base_url.trim_end_matches('/'),
            cover_id,
            self.suffix()
        )
    }
}

/// A book record as returned by the remote catalog
///
/// Field names on the wire follow the catalog's `search.json` documents, and
/// favorites are persisted in the same shape. Records are never mutated after
/// they arrive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Stable catalog identifier (e.g. `/works/OL45804W`)
    pub key: String,

    #[serde(default)]
    pub title: String,

    #[serde(rename = "author_name", default, skip_serializing_if = "Option::is_none")]
    pub author_names: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,

    #[serde(rename = "cover_i", default, skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_sentence: Option<Vec<String>>,

    #[serde(rename = "subject", default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,

    #[serde(rename = "publisher", default, skip_serializing_if = "Option::is_none")]
    pub publishers: Option<Vec<String>>,

    #[serde(rename = "isbn", default, skip_serializing_if = "Option::is_none")]
    pub isbns: Option<Vec<String>>,

    #[serde(rename = "language", default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,

    #[serde(
        rename = "number_of_pages_median",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub page_count_median: Option<u32>,
}

impl Book {
    /// Creates a book with only its key and title set
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            author_names: None,
            first_publish_year: None,
            cover_id: None,
            first_sentence: None,
            subjects: None,
            publishers: None,
            isbns: None,
            languages: None,
            page_count_median: None,
        }
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.author_names = Some(authors);
        self
    }

    pub fn with_cover_id(mut self, cover_id: i64) -> Self {
        self.cover_id = Some(cover_id);
        self
    }

    pub fn with_first_publish_year(mut self, year: i32) -> Self {
        self.first_publish_year = Some(year);
        self
    }

    /// Author line for compact views: the first two authors, comma separated
    pub fn primary_authors(&self) -> Option<String> {
        let authors = self.author_names.as_ref()?;
        if authors.is_empty() {
            return None;
        }
        Some(
            authors
                .iter()
                .take(2)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// Cover image URL on the default cover service
    ///
    /// Returns `None` when the record has no cover id; callers render a
    /// placeholder instead of requesting a missing image.
    pub fn cover_url(&self, size: CoverSize) -> Option<String> {
        self.cover_url_with_base(COVERS_BASE_URL, size)
    }

    /// Cover image URL on a custom cover service
    pub fn cover_url_with_base(&self, base_url: &str, size: CoverSize) -> Option<String> {
        self.cover_id.map(|id| size.url(base_url, id))
    }

    /// First sentence of the work, if the catalog supplied one
    pub fn opening_line(&self) -> Option<&str> {
        self.first_sentence
            .as_ref()
            .and_then(|lines| lines.first())
            .map(String::as_str)
    }
}
