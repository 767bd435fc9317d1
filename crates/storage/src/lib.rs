//! Local key-value persistence for BookFinder
//!
//! Every durable piece of client state (favorites, search history, the
//! daily quote, theme and user record) lives under one key of a small
//! key-value store, JSON encoded.
//!
//! - **Backends**: `FileBackend` keeps one `<key>.json` file per key and
//!   writes atomically; `MemoryBackend` keeps values in a map.
//! - **Typed access**: `PersistentStore` wraps a backend with typed
//!   `get`/`set`/`remove`.
//!
//! # Example
//!
//! ```rust
//! use bookfinder_storage::{keys, PersistentStore};
//!
//! let store = PersistentStore::in_memory();
//! store.set(keys::THEME, &"dark").unwrap();
//! let theme: Option<String> = store.get(keys::THEME).unwrap();
//! assert_eq!(theme.as_deref(), Some("dark"));
//! ```

mod backend;
mod error;
mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::{StorageError, StorageResult};
pub use store::PersistentStore;

/// Keys of the persisted key space
pub mod keys {
    /// Locally fabricated user record
    pub const USER: &str = "user";
    /// Array of favorite books
    pub const FAVORITES: &str = "favorites";
    /// Array of recent searches, most recent first
    pub const SEARCH_HISTORY: &str = "search_history";
    /// Calendar day the stored quote was selected for
    pub const QUOTE_DATE: &str = "quote_date";
    /// Quote selected for `QUOTE_DATE`
    pub const QUOTE: &str = "quote";
    /// `"dark"` when the dark theme is on, absent otherwise
    pub const THEME: &str = "theme";
}
