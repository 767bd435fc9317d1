//! BookFinder Configuration System
//!
//! Settings live in a single TOML file with `[app]`, `[catalog]` and
//! `[carousel]` tables. A missing file or missing keys mean defaults; a
//! table with an out-of-range value is replaced by its defaults when
//! loaded, so whatever reaches the runtime has passed validation.
//!
//! # Example
//!
//! ```rust,no_run
//! use bookfinder_config::ConfigManager;
//!
//! let manager = ConfigManager::new().expect("Failed to locate config directory");
//! let config = manager.load_with_env_overrides();
//!
//! println!("Catalog: {}", config.catalog.base_url);
//! ```

mod error;
mod file;
mod manager;
mod validation;

// Config sections
pub mod app_config;
mod carousel_config;
mod catalog_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use file::ConfigFile;
pub use manager::ConfigManager;
pub use validation::ConfigSection;

// Re-export config sections
pub use app_config::{AppConfig, LogLevel};
pub use carousel_config::CarouselConfig;
pub use catalog_config::CatalogConfig;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    /// Application-level settings
    pub app: AppConfig,

    /// Remote catalog settings
    pub catalog: CatalogConfig,

    /// Category carousel settings
    pub carousel: CarouselConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Problems across all sections; empty when the config is usable as is
    pub fn problems(&self) -> Vec<ValidationError> {
        let mut problems = self.app.problems();
        problems.extend(self.catalog.problems());
        problems.extend(self.carousel.problems());
        problems
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    /// Replaces every section that has problems with its defaults
    ///
    /// Returns the problems that caused a section to be dropped.
    pub fn sanitize(&mut self) -> Vec<ValidationError> {
        let mut rejected = Vec::new();
        self.app = std::mem::take(&mut self.app).or_default(&mut rejected);
        self.catalog = std::mem::take(&mut self.catalog).or_default(&mut rejected);
        self.carousel = std::mem::take(&mut self.carousel).or_default(&mut rejected);
        rejected
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            catalog: CatalogConfig::default(),
            carousel: CarouselConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_version_is_set() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_sanitize_keeps_good_sections() {
        let mut config = Config::default();
        config.catalog.trending_subject = "history".to_string();
        config.carousel.interval_ms = 0;

        let rejected = config.sanitize();

        assert_eq!(rejected.len(), 1);
        assert_eq!(config.catalog.trending_subject, "history");
        assert_eq!(config.carousel, CarouselConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_errors_collected_across_sections() {
        let mut config = Config::default();
        config.catalog.base_url = "ftp://example.org".to_string();
        config.carousel.items_per_view = 0;

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
