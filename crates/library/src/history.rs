//! Recent searches

use crate::error::LibraryResult;
use bookfinder_core::{SearchFilters, SearchHistoryItem, Timestamp};
use bookfinder_storage::{keys, PersistentStore};
use log::{debug, warn};

/// Number of searches kept
pub const MAX_HISTORY_ITEMS: usize = 5;

/// Bounded list of past searches, most recent first
///
/// Holds at most one item per query. Queries compare trimmed and
/// case-sensitive, so "dune" and "Dune" are distinct.
pub struct SearchHistoryCache {
    store: PersistentStore,
    items: Vec<SearchHistoryItem>,
}

impl SearchHistoryCache {
    /// Loads the persisted history
    pub fn load(store: PersistentStore) -> Self {
        let mut items: Vec<SearchHistoryItem> = Vec::new();
        let stored: Vec<SearchHistoryItem> = store.load_or_default(keys::SEARCH_HISTORY);

        for item in stored {
            if items.len() == MAX_HISTORY_ITEMS {
                break;
            }
            if !items.iter().any(|existing| existing.query == item.query) {
                items.push(item);
            }
        }

        debug!("Loaded {} recent searches", items.len());
        Self { store, items }
    }

    /// Records a search issued now
    ///
    /// Returns false (and changes nothing) when the trimmed query is empty.
    pub fn record(&mut self, query: &str, filters: SearchFilters) -> bool {
        self.record_at(query, filters, Timestamp::now())
    }

    /// Records a search issued at `timestamp`
    pub fn record_at(&mut self, query: &str, filters: SearchFilters, timestamp: Timestamp) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }

        self.items.retain(|item| item.query != query);
        self.items
            .insert(0, SearchHistoryItem::new(query, filters, timestamp));
        self.items.truncate(MAX_HISTORY_ITEMS);

        self.persist_or_warn();
        true
    }

    /// Removes the item at `index`; out-of-range indices change nothing
    pub fn remove(&mut self, index: usize) -> Option<SearchHistoryItem> {
        if index >= self.items.len() {
            return None;
        }

        let removed = self.items.remove(index);
        self.persist_or_warn();
        Some(removed)
    }

    /// Empties the history and deletes the persisted key
    pub fn clear(&mut self) {
        self.items.clear();
        if let Err(e) = self.store.remove(keys::SEARCH_HISTORY) {
            warn!("Search history not cleared on disk: {}", e);
        }
    }

    pub fn list(&self) -> &[SearchHistoryItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&SearchHistoryItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn persist(&self) -> LibraryResult<()> {
        self.store.set(keys::SEARCH_HISTORY, &self.items)?;
        Ok(())
    }

    fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            warn!("Search history not saved, keeping in-memory change: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FailingBackend;

    fn cache() -> SearchHistoryCache {
        SearchHistoryCache::load(PersistentStore::in_memory())
    }

    fn queries(cache: &SearchHistoryCache) -> Vec<&str> {
        cache.list().iter().map(|item| item.query.as_str()).collect()
    }

    fn at(millis: i64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    #[test]
    fn test_blank_query_is_ignored() {
        let mut cache = cache();
        assert!(!cache.record("   ", SearchFilters::subject("fantasy")));
        assert!(!cache.record("", SearchFilters::default()));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_query_is_trimmed() {
        let mut cache = cache();
        cache.record("  dune  ", SearchFilters::default());
        assert_eq!(queries(&cache), vec!["dune"]);
    }

    #[test]
    fn test_most_recent_first() {
        let mut cache = cache();
        cache.record_at("a", SearchFilters::default(), at(1));
        cache.record_at("b", SearchFilters::default(), at(2));
        assert_eq!(queries(&cache), vec!["b", "a"]);
    }

    #[test]
    fn test_case_sensitive_queries_are_distinct() {
        let mut cache = cache();
        cache.record("dune", SearchFilters::default());
        cache.record("Dune", SearchFilters::default());
        assert_eq!(queries(&cache), vec!["Dune", "dune"]);
    }

    #[test]
    fn test_repeat_promotes_without_growing() {
        let mut cache = cache();
        for q in ["a", "b", "c"] {
            cache.record(q, SearchFilters::default());
        }

        cache.record_at(" a ", SearchFilters::subject("history"), at(99));

        assert_eq!(queries(&cache), vec!["a", "c", "b"]);
        assert_eq!(cache.get(0).unwrap().timestamp, at(99));
        assert_eq!(cache.get(0).unwrap().filters, SearchFilters::subject("history"));
    }

    #[test]
    fn test_bounded_to_five() {
        let mut cache = cache();
        for q in ["1", "2", "3", "4", "5", "6", "7"] {
            cache.record(q, SearchFilters::default());
        }
        assert_eq!(queries(&cache), vec!["7", "6", "5", "4", "3"]);
    }

    #[test]
    fn test_remove_by_index() {
        let mut cache = cache();
        for q in ["a", "b", "c"] {
            cache.record(q, SearchFilters::default());
        }

        let removed = cache.remove(1).unwrap();
        assert_eq!(removed.query, "b");
        assert_eq!(queries(&cache), vec!["c", "a"]);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut cache = cache();
        cache.record("a", SearchFilters::default());
        assert!(cache.remove(1).is_none());
        assert!(cache.remove(usize::MAX).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_deletes_key() {
        let store = PersistentStore::in_memory();
        let mut cache = SearchHistoryCache::load(store.clone());
        cache.record("a", SearchFilters::default());
        assert!(store.contains(keys::SEARCH_HISTORY));

        cache.clear();
        assert!(cache.is_empty());
        assert!(!store.contains(keys::SEARCH_HISTORY));
    }

    #[test]
    fn test_load_repairs_oversized_history() {
        let store = PersistentStore::in_memory();
        let stored: Vec<SearchHistoryItem> = ["a", "a", "b", "c", "d", "e", "f"]
            .iter()
            .map(|q| SearchHistoryItem::new(*q, SearchFilters::default(), at(0)))
            .collect();
        store.set(keys::SEARCH_HISTORY, &stored).unwrap();

        let cache = SearchHistoryCache::load(store);
        assert_eq!(queries(&cache), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_failed_write_keeps_in_memory_change() {
        let mut cache = SearchHistoryCache::load(PersistentStore::new(FailingBackend));
        assert!(cache.record("dune", SearchFilters::default()));
        cache.clear();
        assert!(cache.is_empty());
    }
}
