//! BookFinder application layer
//!
//! `AppState` is the root object the views talk to. It owns the library
//! stores, the search orchestrator and the carousel, and reports anything
//! the user should see through a notification channel.
//!
//! Searches and the carousel timer run as tokio tasks, so `AppState` must be
//! used from within a tokio runtime.

pub mod carousel;
pub mod notification;
pub mod search;
pub mod state;

pub use carousel::{find_category, CarouselScheduler, CarouselState, Category, CATEGORIES};
pub use notification::{Notification, NotificationKind, NotificationReceiver, Notifier};
pub use search::{SearchOrchestrator, SearchState, SharedHistory};
pub use state::AppState;

use std::sync::{Mutex, MutexGuard};

/// Locks `mutex`, recovering the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
