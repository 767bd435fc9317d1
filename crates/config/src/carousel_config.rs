//! Category carousel configuration section

use crate::validation::{check, ConfigSection};
use crate::ValidationError;
use serde::{Deserialize, Serialize};

/// Timing and layout of the category strip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CarouselConfig {
    /// Autoplay rotation interval in milliseconds
    pub interval_ms: u64,

    /// Number of categories visible at once
    pub items_per_view: usize,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: 4000,
            items_per_view: 4,
        }
    }
}

impl ConfigSection for CarouselConfig {
    const SECTION: &'static str = "carousel";

    fn problems(&self) -> Vec<ValidationError> {
        [
            check::within("carousel.interval_ms", self.interval_ms, 250..=60_000),
            check::within("carousel.items_per_view", self.items_per_view, 1..=12),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CarouselConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_items_per_view_rejected() {
        let config = CarouselConfig {
            items_per_view: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_reverts_to_default() {
        let mut rejected = Vec::new();
        let config = CarouselConfig {
            interval_ms: 0,
            items_per_view: 3,
        }
        .or_default(&mut rejected);

        assert_eq!(config.interval_ms, 4000);
        assert_eq!(config.items_per_view, 4);
        assert_eq!(rejected.len(), 1);
    }
}
