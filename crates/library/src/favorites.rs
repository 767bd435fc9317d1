//! The user's saved books

use crate::error::LibraryResult;
use bookfinder_core::Book;
use bookfinder_storage::{keys, PersistentStore};
use log::{debug, warn};
use std::collections::HashSet;

/// What a toggle did to the favorites set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

impl ToggleOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, ToggleOutcome::Added)
    }
}

/// Favorite books, keyed by catalog key, in the order they were added
///
/// Books are stored by value as they were when favorited; nothing is
/// re-fetched.
pub struct FavoritesStore {
    store: PersistentStore,
    favorites: Vec<Book>,
}

impl FavoritesStore {
    /// Loads the persisted set
    ///
    /// Duplicate keys in stored data are dropped, keeping the first entry.
    pub fn load(store: PersistentStore) -> Self {
        let stored: Vec<Book> = store.load_or_default(keys::FAVORITES);

        let mut seen = HashSet::new();
        let favorites: Vec<Book> = stored
            .into_iter()
            .filter(|book| seen.insert(book.key.clone()))
            .collect();

        debug!("Loaded {} favorites", favorites.len());
        Self { store, favorites }
    }

    /// Adds `book` if its key is absent, removes the existing entry otherwise
    pub fn toggle(&mut self, book: Book) -> ToggleOutcome {
        let outcome = match self.position(&book.key) {
            Some(index) => {
                self.favorites.remove(index);
                ToggleOutcome::Removed
            }
            None => {
                self.favorites.push(book);
                ToggleOutcome::Added
            }
        };

        self.persist_or_warn();
        outcome
    }

    /// Removes the entry for `key`; returns false if there was none
    pub fn remove(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(index) => {
                self.favorites.remove(index);
                self.persist_or_warn();
                true
            }
            None => false,
        }
    }

    pub fn is_favorite(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Book> {
        self.favorites.iter().find(|book| book.key == key)
    }

    pub fn list(&self) -> &[Book] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.favorites.iter().position(|book| book.key == key)
    }

    fn persist(&self) -> LibraryResult<()> {
        self.store.set(keys::FAVORITES, &self.favorites)?;
        Ok(())
    }

    fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            warn!("Favorites not saved, keeping in-memory change: {}", e);
        }
    }
}
