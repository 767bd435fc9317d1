use crate::{SourceError, SourceResult};
use async_trait::async_trait;
use bookfinder_core::{Book, FilterField, SearchFilters};
use reqwest::Url;

/// A remote catalog that can be searched
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Runs one search request
    async fn search(&self, request: &SearchRequest) -> SourceResult<Vec<Book>>;

    /// Get metadata about the source
    fn metadata(&self) -> SourceMetadata;
}

/// One catalog search: free text, structured filters, page size and sort
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub filters: SearchFilters,
    pub limit: usize,
    pub sort: Option<String>,
}

impl SearchRequest {
    /// Page size of a user-initiated search
    pub const USER_LIMIT: usize = 24;
    /// Page size of the startup trending search
    pub const TRENDING_LIMIT: usize = 6;

    /// A search typed by the user
    pub fn user(query: impl Into<String>, filters: SearchFilters) -> Self {
        Self {
            query: query.into(),
            filters,
            limit: Self::USER_LIMIT,
            sort: None,
        }
    }

    /// The fixed-subject search shown before the user searches
    pub fn trending(subject: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            query: String::new(),
            filters: SearchFilters::subject(subject),
            limit: Self::TRENDING_LIMIT,
            sort: Some(sort.into()),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// True when the query or at least one filter is non-blank
    pub fn is_searchable(&self) -> bool {
        !self.query.trim().is_empty() || !self.filters.is_empty()
    }

    /// Query parameters in wire order; blank values are left out
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        let query = self.query.trim();
        if !query.is_empty() {
            params.push(("q", query.to_string()));
        }

        for (field, value) in self.filters.active() {
            params.push((param_name(field), value.to_string()));
        }

        params.push(("limit", self.limit.to_string()));

        if let Some(sort) = &self.sort {
            params.push(("sort", sort.clone()));
        }

        params
    }

    /// Full `search.json` URL below `base_url`
    pub fn url(&self, base_url: &str) -> SourceResult<Url> {
        let endpoint = format!("{}/search.json", base_url.trim_end_matches('/'));
        Url::parse_with_params(&endpoint, self.params())
            .map_err(|e| SourceError::Unavailable(format!("bad catalog URL '{}': {}", endpoint, e)))
    }
}

fn param_name(field: FilterField) -> &'static str {
    match field {
        FilterField::Title => "title",
        FilterField::Author => "author",
        FilterField::Subject => "subject",
        FilterField::Year => "first_publish_year",
        FilterField::Isbn => "isbn",
    }
}

/// Source metadata
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    pub name: String,
    pub description: String,
    pub base_url: String,
    pub requires_auth: bool,
}

#[cfg(test)]
mod trait_tests {
    use super::*;

    #[test]
    fn test_subject_only_search() {
        let request = SearchRequest::user("", SearchFilters::subject("fantasy"));
        let url = request.url("https://openlibrary.org").unwrap();

        assert_eq!(url.path(), "/search.json");
        assert_eq!(url.query(), Some("subject=fantasy&limit=24"));
    }

    #[test]
    fn test_all_params_in_order() {
        let filters = SearchFilters::new()
            .with_isbn("9780441013593")
            .with_title("Dune")
            .with_year("1965")
            .with_author("Frank Herbert");
        let request = SearchRequest::user("spice", filters);

        let names: Vec<&str> = request.params().iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["q", "title", "author", "first_publish_year", "isbn", "limit"]
        );
    }

    #[test]
    fn test_values_are_trimmed_and_encoded() {
        let request = SearchRequest::user("  lord of the rings ", SearchFilters::new().with_author(" "));
        let url = request.url("https://openlibrary.org/").unwrap();
        assert_eq!(url.query(), Some("q=lord+of+the+rings&limit=24"));
    }

    #[test]
    fn test_trending_request() {
        let request = SearchRequest::trending("fiction", "rating");
        let url = request.url("https://openlibrary.org").unwrap();
        assert_eq!(url.query(), Some("subject=fiction&limit=6&sort=rating"));
    }

    #[test]
    fn test_is_searchable() {
        assert!(!SearchRequest::user("  ", SearchFilters::default()).is_searchable());
        assert!(!SearchRequest::user("", SearchFilters::new().with_title("\t")).is_searchable());
        assert!(SearchRequest::user("dune", SearchFilters::default()).is_searchable());
        assert!(SearchRequest::user("", SearchFilters::new().with_isbn("123")).is_searchable());
    }

    #[test]
    fn test_with_limit() {
        let request = SearchRequest::trending("history", "new").with_limit(12);
        assert_eq!(request.limit, 12);
    }

    #[test]
    fn test_invalid_base_url() {
        let request = SearchRequest::user("dune", SearchFilters::default());
        assert!(matches!(
            request.url("not a url"),
            Err(SourceError::Unavailable(_))
        ));
    }
}
