//! Application root state

use crate::carousel::{find_category, CarouselScheduler};
use crate::lock;
use crate::notification::{Notification, NotificationReceiver, Notifier};
use crate::search::{SearchOrchestrator, SearchState, SharedHistory};
use bookfinder_config::Config;
use bookfinder_content_sources::{CatalogSource, SearchRequest};
use bookfinder_core::{Book, QuoteRecord, SearchFilters, SearchHistoryItem, Timestamp};
use bookfinder_library::{
    quote_of_the_day, FavoritesStore, SearchHistoryCache, SessionStore, Theme, ThemePreference,
    ToggleOutcome, UserProfile,
};
use bookfinder_storage::PersistentStore;
use log::{info, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Owns every store and exposes the operations the views trigger
///
/// All persisted state is read once here, at construction.
pub struct AppState {
    favorites: FavoritesStore,
    history: SharedHistory,
    theme: ThemePreference,
    session: SessionStore,
    quote: Option<QuoteRecord>,
    search: SearchOrchestrator,
    carousel: Option<CarouselScheduler>,
    carousel_interval: Duration,
    items_per_view: usize,
    notifier: Notifier,
    bootstrapped: bool,
}

impl AppState {
    /// Loads all stores from `store` and wires the orchestrator to `source`
    pub fn new(
        store: PersistentStore,
        source: Arc<dyn CatalogSource>,
        config: &Config,
    ) -> (Self, NotificationReceiver) {
        let (notifier, rx) = Notifier::channel();

        let history: SharedHistory =
            Arc::new(Mutex::new(SearchHistoryCache::load(store.clone())));

        let trending = SearchRequest::trending(
            config.catalog.trending_subject.as_str(),
            config.catalog.trending_sort.as_str(),
        )
        .with_limit(config.catalog.trending_limit);

        let search = SearchOrchestrator::new(source, Arc::clone(&history), notifier.clone())
            .with_search_limit(config.catalog.search_limit)
            .with_trending_request(trending);

        let state = Self {
            favorites: FavoritesStore::load(store.clone()),
            theme: ThemePreference::load(store.clone()),
            quote: quote_of_the_day(&store),
            session: SessionStore::new(store),
            history,
            search,
            carousel: None,
            carousel_interval: Duration::from_millis(config.carousel.interval_ms),
            items_per_view: config.carousel.items_per_view,
            notifier,
            bootstrapped: false,
        };

        (state, rx)
    }

    /// Issues the trending search; only the first call does anything
    pub fn bootstrap(&mut self) -> Option<JoinHandle<()>> {
        if self.bootstrapped {
            return None;
        }
        self.bootstrapped = true;
        info!("Loading trending books");
        Some(self.search.load_trending())
    }

    // ===== Search =====

    pub fn search(&self, query: &str, filters: SearchFilters) -> Option<JoinHandle<()>> {
        self.search.search(query, filters)
    }

    /// Re-issues the history item at `index`, promoting it to most recent
    pub fn rerun_history(&self, index: usize) -> Option<JoinHandle<()>> {
        let item = lock(&self.history).get(index).cloned()?;
        self.search.search(&item.query, item.filters)
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    pub fn results(&self) -> Vec<Book> {
        self.search.results()
    }

    pub fn trending(&self) -> Vec<Book> {
        self.search.trending()
    }

    pub fn is_loading(&self) -> bool {
        self.search.is_loading()
    }

    pub fn has_searched(&self) -> bool {
        self.search.has_searched()
    }

    // ===== History =====

    pub fn history(&self) -> Vec<SearchHistoryItem> {
        lock(&self.history).list().to_vec()
    }

    pub fn remove_history(&self, index: usize) -> Option<SearchHistoryItem> {
        lock(&self.history).remove(index)
    }

    pub fn clear_history(&self) {
        lock(&self.history).clear();
    }

    // ===== Favorites =====

    pub fn toggle_favorite(&mut self, book: Book) -> ToggleOutcome {
        let title = book.title.clone();
        let outcome = self.favorites.toggle(book);

        let notification = match outcome {
            ToggleOutcome::Added => Notification::added_to_favorites(&title),
            ToggleOutcome::Removed => Notification::removed_from_favorites(&title),
        };
        self.notifier.notify(notification);
        outcome
    }

    /// Toggles the book with `key` from the current results or trending list
    pub fn toggle_favorite_by_key(&mut self, key: &str) -> Option<ToggleOutcome> {
        let book = self
            .favorites
            .get(key)
            .cloned()
            .or_else(|| self.find_loaded(key))?;
        Some(self.toggle_favorite(book))
    }

    pub fn favorites(&self) -> &[Book] {
        self.favorites.list()
    }

    pub fn is_favorite(&self, key: &str) -> bool {
        self.favorites.is_favorite(key)
    }

    fn find_loaded(&self, key: &str) -> Option<Book> {
        let state = self.search.state();
        state
            .results
            .into_iter()
            .chain(state.trending)
            .find(|book| book.key == key)
    }

    // ===== Categories =====

    /// Starts the carousel timer
    pub fn mount_carousel(&mut self) {
        if self.carousel.is_none() {
            self.carousel = Some(CarouselScheduler::for_categories(
                self.items_per_view,
                self.carousel_interval,
            ));
        }
    }

    /// Drops the carousel and its timer
    pub fn unmount_carousel(&mut self) {
        self.carousel = None;
    }

    pub fn carousel(&self) -> Option<&CarouselScheduler> {
        self.carousel.as_ref()
    }

    pub fn carousel_mut(&mut self) -> Option<&mut CarouselScheduler> {
        self.carousel.as_mut()
    }

    /// Searches the category's subject and pauses the carousel
    ///
    /// Returns `None` for an unknown category key.
    pub fn select_category(&mut self, key: &str) -> Option<JoinHandle<()>> {
        let category = find_category(key)?;
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.pause();
        }
        self.search.search("", SearchFilters::subject(category.key))
    }

    // ===== Preferences =====

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme.set(theme);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle()
    }

    /// The quote picked when this state was created
    pub fn quote_of_the_day(&self) -> Option<&QuoteRecord> {
        self.quote.as_ref()
    }

    // ===== Session =====

    /// Signed-in user; an unreadable record counts as signed out
    pub fn current_user(&self) -> Option<UserProfile> {
        match self.session.load() {
            Ok(user) => user,
            Err(e) => {
                warn!("Failed to read user record: {}", e);
                None
            }
        }
    }

    /// Stores a fresh local user record for `email`
    pub fn sign_in(&self, email: &str, name: Option<&str>) -> bookfinder_core::Result<UserProfile> {
        let profile = UserProfile::for_sign_in(email, name, Timestamp::now())?;
        self.session.store(&profile)?;
        Ok(profile)
    }

    pub fn update_profile(&self, name: &str, email: &str) -> bookfinder_core::Result<UserProfile> {
        let profile = self.session.update(name, email)?;
        self.notifier.notify(Notification::info(
            "Profile updated",
            "Your profile has been successfully updated.",
        ));
        Ok(profile)
    }

    /// Deletes the user record and says so
    pub fn sign_out(&self) {
        if let Err(e) = self.session.clear() {
            warn!("User record not removed: {}", e);
        }
        self.notifier.notify(Notification::signed_out());
    }
}
