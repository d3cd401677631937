//! Application configuration.
//!
//! Resolution order: built-in defaults, then an optional TOML file, then
//! `TASKBOARD_*` environment variables. Binding layers may override further.

use crate::quote::DEFAULT_QUOTE_ENDPOINT;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DB_FILE_NAME: &str = "taskboard.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for {key}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the database file and the `logs/` folder.
    pub data_dir: PathBuf,
    pub log_level: String,
    pub quote_endpoint: String,
    pub quote_timeout_secs: u64,
    /// Skip the remote call and show the fallback quote.
    pub offline: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".taskboard"),
            log_level: crate::default_log_level().to_string(),
            quote_endpoint: DEFAULT_QUOTE_ENDPOINT.to_string(),
            quote_timeout_secs: 10,
            offline: false,
        }
    }
}

impl AppConfig {
    /// Loads defaults, the optional file at `path`, and process env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.quote_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "quote_timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(config)
    }

    /// Applies `TASKBOARD_*` overrides read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup("TASKBOARD_DATA_DIR") {
            self.data_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("TASKBOARD_LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = lookup("TASKBOARD_QUOTE_ENDPOINT") {
            self.quote_endpoint = value;
        }
        if let Some(value) = lookup("TASKBOARD_QUOTE_TIMEOUT_SECS") {
            self.quote_timeout_secs = parse_timeout_secs("TASKBOARD_QUOTE_TIMEOUT_SECS", value)?;
        }
        if let Some(value) = lookup("TASKBOARD_OFFLINE") {
            self.offline = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "TASKBOARD_OFFLINE",
                        value,
                    })
                }
            };
        }
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    pub fn quote_timeout(&self) -> Duration {
        Duration::from_secs(self.quote_timeout_secs)
    }
}

/// Timeouts must be positive; a zero timeout would fail every request.
fn parse_timeout_secs(key: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn file_values_fill_gaps_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskboard.toml");
        std::fs::write(&path, "data_dir = \"/var/lib/taskboard\"\noffline = true\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/taskboard"));
        assert!(config.offline);
        assert_eq!(config.quote_timeout_secs, 10);
        assert_eq!(
            config.db_path(),
            PathBuf::from("/var/lib/taskboard/taskboard.sqlite3")
        );
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "offline = [").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("TASKBOARD_QUOTE_ENDPOINT", "http://127.0.0.1:9/quote"),
                ("TASKBOARD_QUOTE_TIMEOUT_SECS", "3"),
                ("TASKBOARD_OFFLINE", "yes"),
            ]))
            .unwrap();

        assert_eq!(config.quote_endpoint, "http://127.0.0.1:9/quote");
        assert_eq!(config.quote_timeout_secs, 3);
        assert!(config.offline);
    }

    #[test]
    fn env_rejects_unparseable_numbers() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[("TASKBOARD_QUOTE_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("TASKBOARD_QUOTE_TIMEOUT_SECS"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[("TASKBOARD_QUOTE_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "TASKBOARD_QUOTE_TIMEOUT_SECS",
                ..
            }
        ));
        assert_eq!(config.quote_timeout_secs, 10);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskboard.toml");
        std::fs::write(&path, "quote_timeout_secs = 0\n").unwrap();
        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "quote_timeout_secs",
                ..
            }
        ));
    }
}
