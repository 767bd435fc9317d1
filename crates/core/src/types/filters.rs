//! Structured search filters

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the structured filter fields offered next to the free-text query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Title,
    Author,
    Subject,
    Year,
    Isbn,
}

impl FilterField {
    /// All fields, in the order they are encoded into a request
    pub const ALL: [FilterField; 5] = [
        FilterField::Title,
        FilterField::Author,
        FilterField::Subject,
        FilterField::Year,
        FilterField::Isbn,
    ];
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterField::Title => write!(f, "title"),
            FilterField::Author => write!(f, "author"),
            FilterField::Subject => write!(f, "subject"),
            FilterField::Year => write!(f, "year"),
            FilterField::Isbn => write!(f, "isbn"),
        }
    }
}

/// Filter snapshot attached to a search
///
/// Every field is optional. A field holding only whitespace counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters containing only a subject, as issued by category selection
    pub fn subject(subject: impl Into<String>) -> Self {
        Self::default().with_subject(subject)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    /// Trimmed value of a field, or `None` when unset or blank
    pub fn get(&self, field: FilterField) -> Option<&str> {
        let raw = match field {
            FilterField::Title => &self.title,
            FilterField::Author => &self.author,
            FilterField::Subject => &self.subject,
            FilterField::Year => &self.year,
            FilterField::Isbn => &self.isbn,
        };
        raw.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Non-blank fields in request order
    pub fn active(&self) -> Vec<(FilterField, &str)> {
        FilterField::ALL
            .iter()
            .filter_map(|&field| self.get(field).map(|value| (field, value)))
            .collect()
    }

    /// True when no field carries a non-blank value
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|&field| self.get(field).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_are_inactive() {
        let filters = SearchFilters::new().with_title("   ").with_author("");
        assert!(filters.is_empty());
        assert!(filters.active().is_empty());
    }

    #[test]
    fn test_active_preserves_request_order_and_trims() {
        let filters = SearchFilters::new()
            .with_isbn(" 9780441013593 ")
            .with_subject("fantasy")
            .with_title("Dune");

        assert_eq!(
            filters.active(),
            vec![
                (FilterField::Title, "Dune"),
                (FilterField::Subject, "fantasy"),
                (FilterField::Isbn, "9780441013593"),
            ]
        );
    }

    #[test]
    fn test_deserialize_accepts_missing_and_empty_fields() {
        let filters: SearchFilters =
            serde_json::from_str(r#"{"title":"","subject":"history"}"#).unwrap();
        assert_eq!(filters.get(FilterField::Subject), Some("history"));
        assert_eq!(filters.get(FilterField::Title), None);
        assert_eq!(filters.author, None);
    }
}
