//! Application-level configuration section

use crate::validation::{check, ConfigSection};
use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Log level for application logging
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(ValidationError::new(
                "app.log_level",
                format!("must be one of error, warn, info, debug, trace (got '{}')", other),
            )),
        }
    }
}

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Log level for application output
    pub log_level: LogLevel,

    /// Where favorites, history and the daily quote are stored.
    /// Unset means the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            data_dir: None,
        }
    }
}

impl ConfigSection for AppConfig {
    const SECTION: &'static str = "app";

    fn problems(&self) -> Vec<ValidationError> {
        self.data_dir
            .as_ref()
            .and_then(|dir| check::non_blank("app.data_dir", &dir.to_string_lossy()))
            .into_iter()
            .collect()
    }
}
