//! Runtime configuration for the auth core.
//!
//! Values come from a JSON document or from `BACKOFFICE_*` environment
//! variables; every field has a default so an empty source is valid.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const DB_PATH_ENV: &str = "BACKOFFICE_DB_PATH";
const LOG_LEVEL_ENV: &str = "BACKOFFICE_LOG_LEVEL";
const LOG_DIR_ENV: &str = "BACKOFFICE_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "backoffice.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// SQLite file holding the `employees` table.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    EmptyDbPath,
    RelativeLogDir(PathBuf),
    NonUtf8LogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::EmptyDbPath => write!(f, "db_path must not be empty"),
            Self::RelativeLogDir(path) => {
                write!(f, "log_dir must be absolute, got `{}`", path.display())
            }
            Self::NonUtf8LogDir(path) => {
                write!(f, "log_dir must be valid UTF-8, got `{}`", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()
    }

    /// Builds config from environment variables over defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        if let Some(dir) = read(LOG_DIR_ENV) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
            if dir.to_str().is_none() {
                return Err(ConfigError::NonUtf8LogDir(dir.clone()));
            }
        }
        Ok(self)
    }

    /// Starts file logging when `log_dir` is configured.
    pub fn init_logging(&self) -> Result<(), String> {
        let Some(dir) = &self.log_dir else {
            return Ok(());
        };
        let dir = dir
            .to_str()
            .ok_or_else(|| ConfigError::NonUtf8LogDir(dir.clone()).to_string())?;
        crate::logging::init_logging(&self.log_level, dir)
    }
}
