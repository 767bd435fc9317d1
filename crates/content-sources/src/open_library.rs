use crate::{CatalogSource, SearchRequest, SourceError, SourceMetadata, SourceResult};
use async_trait::async_trait;
use bookfinder_core::Book;
use log::debug;
use serde::Deserialize;
use std::time::Duration as StdDuration;

/// `search.json` response; only the documents are used
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Option<Vec<Book>>,
}

/// Decodes a `search.json` body
///
/// A body without `docs` is an empty result, not an error.
pub fn parse_search_response(body: &str) -> SourceResult<Vec<Book>> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::ParseError(format!("JSON parse error: {}", e)))?;
    Ok(response.docs.unwrap_or_default())
}

/// Open Library catalog search
pub struct OpenLibrarySource {
    base_url: String,
    timeout_secs: u64,
    client: Option<reqwest::Client>,
}

impl OpenLibrarySource {
    const API_BASE: &'static str = "https://openlibrary.org";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Create a source for the public Open Library service
    pub fn new() -> Self {
        Self::with_base_url(Self::API_BASE, Self::DEFAULT_TIMEOUT_SECS)
    }

    /// Create a source for a catalog served at `base_url`
    pub fn with_base_url(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
            ))
            .build()
            .ok();

        Self {
            base_url: base_url.into(),
            timeout_secs,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OpenLibrarySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for OpenLibrarySource {
    async fn search(&self, request: &SearchRequest) -> SourceResult<Vec<Book>> {
        if !request.is_searchable() {
            return Err(SourceError::InvalidQuery("Empty query".to_string()));
        }

        let client = self
            .client
            .as_ref()
            .ok_or_else(|| SourceError::NetworkError("HTTP client not available".to_string()))?;

        let url = request.url(&self.base_url)?;
        debug!("Catalog request: {}", url);

        let response = client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else {
                SourceError::NetworkError(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }
        if !status.is_success() {
            return Err(SourceError::NetworkError(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::NetworkError(format!("Failed to read body: {}", e)))?;

        let books = parse_search_response(&body)?;
        debug!("Catalog returned {} records", books.len());
        Ok(books)
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Open Library".to_string(),
            description: "Open, editable library catalog".to_string(),
            base_url: self.base_url.clone(),
            requires_auth: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_docs() {
        let body = r#"{
            "numFound": 2,
            "docs": [
                {"key": "/works/OL893415W", "title": "Dune", "author_name": ["Frank Herbert"],
                 "first_publish_year": 1965, "cover_i": 11481354, "number_of_pages_median": 604},
                {"key": "/works/OL1W", "title": "Untitled", "ebook_access": "no_ebook"}
            ]
        }"#;

        let books = parse_search_response(body).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].first_publish_year, Some(1965));
        assert_eq!(books[0].page_count_median, Some(604));
        assert_eq!(books[1].author_names, None);
    }

    #[test]
    fn test_missing_docs_is_empty() {
        assert!(parse_search_response(r#"{"numFound": 0}"#).unwrap().is_empty());
        assert!(parse_search_response(r#"{"docs": null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_non_json_is_parse_error() {
        assert!(matches!(
            parse_search_response("<html>502 Bad Gateway</html>"),
            Err(SourceError::ParseError(_))
        ));
        assert!(matches!(
            parse_search_response("[1, 2]"),
            Err(SourceError::ParseError(_))
        ));
    }

    #[test]
    fn test_metadata() {
        let source = OpenLibrarySource::with_base_url("http://localhost:9000", 5);
        let metadata = source.metadata();
        assert_eq!(metadata.name, "Open Library");
        assert_eq!(metadata.base_url, "http://localhost:9000");
        assert!(!metadata.requires_auth);
    }

    #[tokio::test]
    async fn test_blank_request_is_rejected_locally() {
        let source = OpenLibrarySource::new();
        let request = SearchRequest::user("   ", Default::default());
        assert!(matches!(
            source.search(&request).await,
            Err(SourceError::InvalidQuery(_))
        ));
    }
}
