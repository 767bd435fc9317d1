//! Common types shared across domain models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp in milliseconds since Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp for the current moment
    ///
    /// Falls back to timestamp 0 if the system clock reads before UNIX_EPOCH.
    pub fn now() -> Self {
        Self(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_else(|_| std::time::Duration::from_secs(0))
                .as_millis() as i64,
        )
    }

    /// Creates a timestamp from milliseconds since Unix epoch
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as milliseconds since Unix epoch
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`, never negative
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0).max(0) as u64
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
