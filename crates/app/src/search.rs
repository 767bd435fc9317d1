//! Search orchestration
//!
//! `SearchOrchestrator::search` returns as soon as the request is spawned.
//! Each invocation gets a generation number; when its response arrives it
//! only touches the result list (and notifies) if no newer search has been
//! issued since. The loading flag is the count of invocations still in
//! flight, so stale ones still clear their own share.

use crate::lock;
use crate::notification::{Notification, Notifier};
use bookfinder_content_sources::{CatalogSource, SearchRequest, SourceResult};
use bookfinder_core::{AppError, Book, SearchFilters};
use bookfinder_library::SearchHistoryCache;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// History cache shared between the orchestrator and whoever renders it
pub type SharedHistory = Arc<Mutex<SearchHistoryCache>>;

/// What the result views read
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Results of the latest completed user search
    pub results: Vec<Book>,
    /// Results of the startup trending search
    pub trending: Vec<Book>,
    /// User searches dispatched but not yet completed
    pub in_flight: usize,
    /// Set once the user has issued a search
    pub has_searched: bool,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

struct Shared {
    state: Mutex<SearchState>,
    generation: AtomicU64,
    disposed: AtomicBool,
    notifier: Notifier,
}

pub struct SearchOrchestrator {
    source: Arc<dyn CatalogSource>,
    history: SharedHistory,
    shared: Arc<Shared>,
    search_limit: usize,
    trending: SearchRequest,
}

impl SearchOrchestrator {
    pub fn new(source: Arc<dyn CatalogSource>, history: SharedHistory, notifier: Notifier) -> Self {
        Self {
            source,
            history,
            shared: Arc::new(Shared {
                state: Mutex::new(SearchState::default()),
                generation: AtomicU64::new(0),
                disposed: AtomicBool::new(false),
                notifier,
            }),
            search_limit: SearchRequest::USER_LIMIT,
            trending: SearchRequest::trending("fiction", "rating"),
        }
    }

    /// Overrides the user page size
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Overrides the startup trending request
    pub fn with_trending_request(mut self, request: SearchRequest) -> Self {
        self.trending = request;
        self
    }

    /// Starts a user search
    ///
    /// Returns `None` without doing anything when both the query and every
    /// filter are blank. Otherwise the request is spawned on the current
    /// tokio runtime, the loading flag goes up, and the query is recorded in
    /// the search history.
    pub fn search(&self, query: &str, filters: SearchFilters) -> Option<JoinHandle<()>> {
        let request =
            SearchRequest::user(query.trim(), filters.clone()).with_limit(self.search_limit);
        if !request.is_searchable() {
            debug!("Ignoring search with empty query and filters");
            return None;
        }
        if self.shared.disposed.load(Ordering::SeqCst) {
            debug!("Ignoring search on disposed orchestrator");
            return None;
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = lock(&self.shared.state);
            state.in_flight += 1;
            state.has_searched = true;
        }

        let summary = describe(&request);
        debug!("Dispatching search #{}: {}", generation, summary);
        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            let result = source.search(&request).await;
            shared.complete(generation, summary, result);
        });

        lock(&self.history).record(query, filters);

        Some(handle)
    }

    /// Starts the trending search shown before any user search
    ///
    /// Failures are only logged; neither the loading flag nor the user's
    /// results are touched.
    pub fn load_trending(&self) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.shared);
        let request = self.trending.clone();

        tokio::spawn(async move {
            match source.search(&request).await {
                Ok(books) => {
                    if shared.disposed.load(Ordering::SeqCst) {
                        return;
                    }
                    debug!("Loaded {} trending books", books.len());
                    lock(&shared.state).trending = books;
                }
                Err(e) => warn!("Error fetching trending books: {}", e),
            }
        })
    }

    /// Snapshot of the current result state
    pub fn state(&self) -> SearchState {
        lock(&self.shared.state).clone()
    }

    pub fn results(&self) -> Vec<Book> {
        lock(&self.shared.state).results.clone()
    }

    pub fn trending(&self) -> Vec<Book> {
        lock(&self.shared.state).trending.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.shared.state).is_loading()
    }

    pub fn has_searched(&self) -> bool {
        lock(&self.shared.state).has_searched
    }

    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    /// Detaches in-flight searches; their results are discarded on arrival
    pub fn dispose(&self) {
        self.shared.disposed.store(true, Ordering::SeqCst);
    }
}

impl Drop for SearchOrchestrator {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Shared {
    fn complete(&self, generation: u64, summary: String, result: SourceResult<Vec<Book>>) {
        let mut state = lock(&self.state);
        state.in_flight = state.in_flight.saturating_sub(1);

        if self.disposed.load(Ordering::SeqCst) {
            debug!("Discarding search #{}: owner disposed", generation);
            return;
        }
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale search #{}", generation);
            return;
        }

        let outcome = match result {
            Ok(books) if !books.is_empty() => {
                state.results = books;
                return;
            }
            Ok(books) => {
                state.results = books;
                AppError::NoResults { query: summary }
            }
            Err(e) => AppError::from(e),
        };
        drop(state);

        if outcome.is_user_visible_failure() {
            warn!("Search #{} failed: {}", generation, outcome);
        } else {
            debug!("Search #{}: {}", generation, outcome);
        }
        if let Some(notification) = Notification::for_search_error(&outcome) {
            self.notifier.notify(notification);
        }
    }
}

/// `q=dune&author=herbert` without the paging parameters
fn describe(request: &SearchRequest) -> String {
    request
        .params()
        .into_iter()
        .filter(|(name, _)| !matches!(*name, "limit" | "sort"))
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationReceiver;
    use async_trait::async_trait;
    use bookfinder_content_sources::{SourceError, SourceMetadata};
    use bookfinder_storage::PersistentStore;

    /// Answers every request with the same books and records what it saw
    struct FixedSource {
        books: Vec<Book>,
        requests: Mutex<Vec<SearchRequest>>,
    }

    #[async_trait]
    impl CatalogSource for FixedSource {
        async fn search(&self, request: &SearchRequest) -> SourceResult<Vec<Book>> {
            lock(&self.requests).push(request.clone());
            if self.books.is_empty() && request.query == "fail" {
                return Err(SourceError::NetworkError("HTTP 503".to_string()));
            }
            Ok(self.books.clone())
        }

        fn metadata(&self) -> SourceMetadata {
            SourceMetadata {
                name: "fixed".to_string(),
                description: String::new(),
                base_url: String::new(),
                requires_auth: false,
            }
        }
    }

    fn setup(books: Vec<Book>) -> (SearchOrchestrator, Arc<FixedSource>, NotificationReceiver) {
        let source = Arc::new(FixedSource {
            books,
            requests: Mutex::new(Vec::new()),
        });
        let history = Arc::new(Mutex::new(SearchHistoryCache::load(
            PersistentStore::in_memory(),
        )));
        let (notifier, rx) = Notifier::channel();
        let orchestrator = SearchOrchestrator::new(source.clone(), history, notifier);
        (orchestrator, source, rx)
    }

    #[tokio::test]
    async fn test_blank_search_is_noop() {
        let (orchestrator, source, mut rx) = setup(vec![]);

        assert!(orchestrator.search("  ", SearchFilters::default()).is_none());
        assert!(!orchestrator.is_loading());
        assert!(!orchestrator.has_searched());
        assert!(lock(&source.requests).is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_results_replace_previous() {
        let (orchestrator, _source, _rx) = setup(vec![Book::new("/works/A", "A")]);

        orchestrator
            .search("a", SearchFilters::default())
            .unwrap()
            .await
            .unwrap();

        assert_eq!(orchestrator.results().len(), 1);
        assert!(orchestrator.has_searched());
        assert!(!orchestrator.is_loading());
    }

    #[tokio::test]
    async fn test_empty_results_notify_without_error() {
        let (orchestrator, _source, mut rx) = setup(vec![]);

        orchestrator
            .search("", SearchFilters::subject("fantasy"))
            .unwrap()
            .await
            .unwrap();

        let notification = rx.try_recv().unwrap();
        assert_eq!(notification.title, "No results found");
        assert!(!notification.is_destructive());
        assert!(orchestrator.results().is_empty());
    }

    #[tokio::test]
    async fn test_failure_notifies_destructively() {
        let (orchestrator, _source, mut rx) = setup(vec![]);

        orchestrator
            .search("fail", SearchFilters::default())
            .unwrap()
            .await
            .unwrap();

        let notification = rx.try_recv().unwrap();
        assert!(notification.is_destructive());
        assert_eq!(notification.title, "Search failed");
        assert!(!orchestrator.is_loading());
    }

    #[test]
    fn test_describe_skips_paging() {
        let request = SearchRequest::user("dune", SearchFilters::default().with_author("Herbert"))
            .with_limit(24);
        assert_eq!(describe(&request), "q=dune&author=Herbert");
    }

    #[tokio::test]
    async fn test_history_recorded_at_dispatch() {
        let (orchestrator, _source, _rx) = setup(vec![]);

        let handle = orchestrator
            .search(" fail ", SearchFilters::default())
            .unwrap();
        assert_eq!(lock(orchestrator.history()).list()[0].query, "fail");
        handle.await.unwrap();

        assert_eq!(lock(orchestrator.history()).len(), 1);
    }

    #[tokio::test]
    async fn test_trending_uses_fixed_request() {
        let (orchestrator, source, mut rx) = setup(vec![Book::new("/works/T", "T")]);

        orchestrator.load_trending().await.unwrap();

        let requests = lock(&source.requests);
        assert_eq!(requests[0], SearchRequest::trending("fiction", "rating"));
        assert_eq!(orchestrator.trending().len(), 1);
        assert!(orchestrator.results().is_empty());
        assert!(!orchestrator.has_searched());
        assert!(lock(orchestrator.history()).is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disposed_search_discards_result() {
        let (orchestrator, _source, mut rx) = setup(vec![]);

        let handle = orchestrator.search("dune", SearchFilters::default()).unwrap();
        orchestrator.dispose();
        handle.await.unwrap();

        assert!(rx.try_recv().is_err());
        assert!(orchestrator.search("dune", SearchFilters::default()).is_none());
    }
}
