//! Runtime configuration for the CRM core.
//!
//! # Responsibility
//! - Describe where the store lives and how logging is set up.
//! - Load that description from JSON text or a JSON file.
//!
//! # Invariants
//! - Missing optional keys fall back to documented defaults.
//! - Loading never touches the database or the logger.

use crate::db::DEFAULT_BUSY_TIMEOUT_MS;
use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Core configuration loaded by embedding services and the CLI probe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// SQLite file path. `None` opens an in-memory store.
    pub database_path: Option<PathBuf>,
    /// SQLite busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
    /// Log level (`trace|debug|info|warn|error`).
    pub log_level: String,
    /// Absolute log directory. `None` leaves logging uninitialized.
    pub log_dir: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Parses configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Parse)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        Self::from_json_str(&text)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use std::path::PathBuf;

    #[test]
    fn empty_object_uses_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.busy_timeout_ms, 5_000);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = CoreConfig::from_json_str(
            r#"{"database_path": "/var/lib/crm/crm.sqlite3", "busy_timeout_ms": 250, "log_level": "warn"}"#,
        )
        .unwrap();
        assert_eq!(
            config.database_path,
            Some(PathBuf::from("/var/lib/crm/crm.sqlite3"))
        );
        assert_eq!(config.busy_timeout_ms, 250);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CoreConfig::from_json_str(r#"{"database": "x"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = CoreConfig::from_file("/nonexistent/crm-config.json").unwrap_err();
        assert!(err.to_string().contains("crm-config.json"));
    }
}
