//! `config.toml` on disk

use crate::error::describe;
use crate::{Config, ConfigError, ConfigResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The settings file and its `.toml.backup` sibling
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the previous file, refreshed before every save
    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("toml.backup")
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Parses the file exactly as written, without repairing anything
    ///
    /// `None` when there is no file yet.
    pub fn read(&self) -> ConfigResult<Option<Config>> {
        if !self.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Err(ConfigError::Empty {
                path: self.path.clone(),
            });
        }

        toml::from_str(&contents)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Settings ready for use: defaults when there is no file, and any
    /// section with a bad value reset to its defaults
    pub fn load(&self) -> ConfigResult<Config> {
        let Some(mut config) = self.read()? else {
            log::info!("No config at {}, using defaults", self.path.display());
            return Ok(Config::default());
        };

        let rejected = config.sanitize();
        if !rejected.is_empty() {
            log::warn!(
                "{} has {} invalid setting(s)",
                self.path.display(),
                rejected.len()
            );
        }
        Ok(config)
    }

    /// Writes `config`, keeping the previous file as a backup
    ///
    /// Settings that `load` would throw away are refused instead.
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        if let Err(problems) = config.validate() {
            log::debug!("Not saving config: {}", describe(&problems));
            return Err(ConfigError::Invalid(problems));
        }

        let rendered = toml::to_string_pretty(config)?;
        let dir = self.directory();

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| write_error(dir, e))?;
            log::info!("Created config directory {}", dir.display());
        }

        if self.exists() {
            let backup = self.backup_path();
            fs::copy(&self.path, &backup).map_err(|e| write_error(&backup, e))?;
        }

        let mut staged = NamedTempFile::new_in(dir).map_err(|e| write_error(dir, e))?;
        staged
            .write_all(rendered.as_bytes())
            .map_err(|e| write_error(staged.path(), e))?;
        staged
            .persist(&self.path)
            .map_err(|e| write_error(&self.path, e.error))?;

        log::info!("Config saved to {}", self.path.display());
        Ok(())
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

fn write_error(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::Write {
        path: path.to_path_buf(),
        source,
    }
}
