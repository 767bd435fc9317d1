//! Error types for the configuration system

use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures reading or writing `config.toml`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file exists but holds nothing
    #[error("{path} is empty")]
    Empty { path: PathBuf },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Settings that would not survive the next load
    #[error("Refusing to save invalid settings: {}", describe(.0))]
    Invalid(Vec<ValidationError>),

    /// Any filesystem failure while saving (directory, backup, temp file, rename)
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No home directory to keep BookFinder settings in")]
    NoHomeDirectory,
}

/// One rejected setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted TOML path, e.g. `carousel.interval_ms`
    pub field: &'static str,
    pub problem: String,
}

impl ValidationError {
    pub fn new(field: &'static str, problem: impl Into<String>) -> Self {
        Self {
            field,
            problem: problem.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.problem)
    }
}

impl std::error::Error for ValidationError {}

/// Joins problems into one log or error line
pub fn describe(problems: &[ValidationError]) -> String {
    problems
        .iter()
        .map(ValidationError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
