//! Locating, loading and writing BookFinder settings

use crate::{Config, ConfigError, ConfigFile, ConfigResult, LogLevel, ValidationError};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const APPLICATION: &str = "bookfinder";
const FILE_NAME: &str = "config.toml";

/// Entry point for everything the binary does with settings
///
/// - Linux: `~/.config/bookfinder/config.toml`
/// - macOS: `~/Library/Application Support/bookfinder/config.toml`
/// - Windows: `%APPDATA%\bookfinder\config.toml`
pub struct ConfigManager {
    file: ConfigFile,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Manager for the platform config directory
    pub fn new() -> ConfigResult<Self> {
        Ok(Self::with_directory(Self::project_dirs()?.config_dir()))
    }

    /// Manager for `config.toml` inside `config_dir`
    pub fn with_directory(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            file: ConfigFile::new(config_dir.join(FILE_NAME)),
            config_dir,
        }
    }

    fn project_dirs() -> ConfigResult<ProjectDirs> {
        ProjectDirs::from("", "", APPLICATION).ok_or(ConfigError::NoHomeDirectory)
    }

    /// Platform data directory used when `app.data_dir` is unset
    pub fn default_data_dir() -> ConfigResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> &Path {
        self.file.path()
    }

    /// Directory the persistent store should use for `config`
    pub fn data_dir(&self, config: &Config) -> ConfigResult<PathBuf> {
        match &config.app.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::default_data_dir(),
        }
    }

    /// Settings from the file; invalid sections come back as defaults
    pub fn load(&self) -> ConfigResult<Config> {
        self.file.load()
    }

    /// Like `load`, but an unreadable file also means defaults
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|e| {
            log::warn!("Ignoring {}: {}", self.config_path().display(), e);
            Config::default()
        })
    }

    /// The settings the app runs with: file, then `BOOKFINDER_*` variables
    ///
    /// Recognised variables:
    /// - `BOOKFINDER_CATALOG_BASE_URL`
    /// - `BOOKFINDER_APP_DATA_DIR`
    /// - `BOOKFINDER_APP_LOG_LEVEL`
    ///
    /// The result always passes validation.
    pub fn load_with_env_overrides(&self) -> Config {
        let mut config = self.load_or_default();
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        config
    }

    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.file.save(config)
    }

    /// Writes a default file unless one exists; true if it wrote one
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.file.exists() {
            return Ok(false);
        }

        self.save(&Config::default())?;
        Ok(true)
    }

    /// Problems in the file as written
    ///
    /// A missing file has none. Parse failures are errors.
    pub fn validate(&self) -> ConfigResult<Vec<ValidationError>> {
        Ok(self
            .file
            .read()?
            .map(|config| config.problems())
            .unwrap_or_default())
    }

    /// Overwrites the file with defaults; the old one stays as the backup
    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())?;
        log::info!("Config reset to defaults");
        Ok(())
    }

    pub fn backup_path(&self) -> PathBuf {
        self.file.backup_path()
    }
}

/// Applies `BOOKFINDER_*` overrides read through `lookup`, then drops any
/// section an override broke
fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("BOOKFINDER_CATALOG_BASE_URL") {
        config.catalog.base_url = url;
    }

    if let Some(dir) = lookup("BOOKFINDER_APP_DATA_DIR") {
        config.app.data_dir = Some(PathBuf::from(dir));
    }

    if let Some(level) = lookup("BOOKFINDER_APP_LOG_LEVEL") {
        match level.parse::<LogLevel>() {
            Ok(level) => config.app.log_level = level,
            Err(e) => log::warn!("Ignoring BOOKFINDER_APP_LOG_LEVEL: {}", e),
        }
    }

    let rejected = config.sanitize();
    if !rejected.is_empty() {
        log::warn!("Environment overrides rejected: {} problem(s)", rejected.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn setup_test_manager() -> (TempDir, ConfigManager) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let manager = ConfigManager::with_directory(temp_dir.path());
        (temp_dir, manager)
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let (_temp_dir, manager) = setup_test_manager();
        assert_eq!(manager.load_or_default(), Config::default());
    }

    #[test]
    fn test_load_or_default_with_corrupted_file() {
        let (_temp_dir, manager) = setup_test_manager();
        std::fs::write(manager.config_path(), "[catalog\nbroken").expect("Should write");
        assert_eq!(manager.load_or_default(), Config::default());
    }

    #[test]
    fn test_initialize_only_once() {
        let (_temp_dir, manager) = setup_test_manager();

        assert!(manager.initialize().expect("Should initialize"));
        assert!(manager.config_path().exists());
        assert!(!manager.initialize().expect("Should initialize"));
    }

    #[test]
    fn test_validate_reports_raw_file_problems() {
        let (_temp_dir, manager) = setup_test_manager();
        assert!(manager.validate().expect("Should validate").is_empty());

        std::fs::write(manager.config_path(), "[carousel]\ninterval_ms = 0\n").expect("Should write");
        let problems = manager.validate().expect("Should validate");
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].field, "carousel.interval_ms");
    }

    #[test]
    fn test_reset_keeps_backup() {
        let (_temp_dir, manager) = setup_test_manager();
        std::fs::write(manager.config_path(), "[catalog]\nsearch_limit = 50\n").expect("Should write");

        manager.reset().expect("Should reset");

        assert_eq!(manager.load().expect("Should load"), Config::default());
        let backup = std::fs::read_to_string(manager.backup_path()).expect("Should read backup");
        assert!(backup.contains("search_limit = 50"));
    }

    #[test]
    fn test_data_dir_prefers_configured_value() {
        let (temp_dir, manager) = setup_test_manager();
        let mut config = Config::default();
        config.app.data_dir = Some(temp_dir.path().join("data"));

        assert_eq!(
            manager.data_dir(&config).expect("Should resolve"),
            temp_dir.path().join("data")
        );
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("BOOKFINDER_CATALOG_BASE_URL", "http://localhost:9000"),
            ("BOOKFINDER_APP_DATA_DIR", "/tmp/bookfinder"),
            ("BOOKFINDER_APP_LOG_LEVEL", "debug"),
        ]);

        let mut config = Config::default();
        apply_env_overrides(&mut config, |name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.catalog.base_url, "http://localhost:9000");
        assert_eq!(config.app.data_dir, Some(PathBuf::from("/tmp/bookfinder")));
        assert_eq!(config.app.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_bad_base_url_override_resets_catalog() {
        let mut config = Config::default();
        config.catalog.trending_subject = "poetry".to_string();
        apply_env_overrides(&mut config, |name| {
            (name == "BOOKFINDER_CATALOG_BASE_URL").then(|| "openlibrary".to_string())
        });
        assert_eq!(config.catalog, crate::CatalogConfig::default());
    }

    #[test]
    fn test_invalid_log_level_override_is_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |name| {
            (name == "BOOKFINDER_APP_LOG_LEVEL").then(|| "shouty".to_string())
        });
        assert_eq!(config.app.log_level, LogLevel::Info);
    }
}
