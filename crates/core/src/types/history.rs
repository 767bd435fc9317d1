//! Search history items

use crate::types::{SearchFilters, Timestamp};
use serde::{Deserialize, Serialize};

const MINUTE_MS: u64 = 60 * 1000;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

/// A past user search, as shown in the recent searches list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    /// Trimmed query text
    pub query: String,

    #[serde(default)]
    pub filters: SearchFilters,

    /// When the search was issued
    pub timestamp: Timestamp,
}

impl SearchHistoryItem {
    pub fn new(query: impl Into<String>, filters: SearchFilters, timestamp: Timestamp) -> Self {
        Self {
            query: query.into(),
            filters,
            timestamp,
        }
    }

    /// Age of this item relative to `now`, e.g. "3 hours ago"
    pub fn age(&self, now: Timestamp) -> String {
        format_age(now, self.timestamp)
    }
}

/// Formats the age of `timestamp` relative to `now`
///
/// Under a minute reads "Just now"; otherwise the largest whole unit among
/// days, hours and minutes is used, pluralized.
pub fn format_age(now: Timestamp, timestamp: Timestamp) -> String {
    let elapsed = now.millis_since(timestamp);

    let days = elapsed / DAY_MS;
    let hours = elapsed / HOUR_MS;
    let minutes = elapsed / MINUTE_MS;

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "Just now".to_string()
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
