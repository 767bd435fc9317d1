//! BookFinder Library
//!
//! The user's personal collection on top of the persistent store: favorites,
//! recent searches, the quote of the day, theme preference and the local
//! user record.
//!
//! Every store loads its key once when constructed and keeps the in-memory
//! copy as the source of truth. Mutations write through immediately; a write
//! that fails is logged and the in-memory change stands.

pub mod error;
pub mod favorites;
pub mod history;
pub mod quotes;
pub mod rotation;
pub mod session;
pub mod theme;

pub use error::{LibraryError, LibraryResult};
pub use favorites::{FavoritesStore, ToggleOutcome};
pub use history::{SearchHistoryCache, MAX_HISTORY_ITEMS};
pub use quotes::{quote_catalogue, quote_for, quote_of_the_day};
pub use rotation::{date_stamp, rotation_index, DailyRotationSelector, Selection};
pub use session::{SessionStore, UserProfile};
pub use theme::{Theme, ThemePreference};
