//! Runtime configuration resolved from environment variables.
//!
//! # Responsibility
//! - Resolve storage, logging and AI settings with documented defaults.
//! - Keep resolution pure over a lookup function so it can be tested without
//!   touching the process environment.
//!
//! # Invariants
//! - Blank values are treated as unset.
//! - Invalid values are rejected instead of silently defaulted.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "MINDPAD_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "MINDPAD_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MINDPAD_LOG_DIR";
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_API_KEY_FALLBACK: &str = "API_KEY";
pub const ENV_AI_MODEL: &str = "MINDPAD_AI_MODEL";
pub const ENV_AI_ENDPOINT: &str = "MINDPAD_AI_ENDPOINT";
pub const ENV_AI_TIMEOUT_SECS: &str = "MINDPAD_AI_TIMEOUT_SECS";

const DEFAULT_DB_FILE_NAME: &str = "mindpad.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "mindpad-logs";
pub const DEFAULT_AI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_AI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

/// Configuration error for one environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.key, self.message)
    }
}

impl Error for ConfigError {}

/// Remote text-generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    /// `None` when no key is configured; AI actions then fail as service
    /// errors.
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL without a trailing slash.
    pub endpoint: String,
    /// Transport timeout for one round trip.
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_AI_MODEL.to_string(),
            endpoint: DEFAULT_AI_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

/// Full core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub ai: AiConfig,
}

impl CoreConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_dir = read(ENV_LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));
        let log_level = read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());

        let timeout = match read(ENV_AI_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError {
                        key: ENV_AI_TIMEOUT_SECS,
                        message: format!("expected a positive integer, got `{raw}`"),
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        };

        let ai = AiConfig {
            api_key: read(ENV_API_KEY).or_else(|| read(ENV_API_KEY_FALLBACK)),
            model: read(ENV_AI_MODEL).unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            endpoint: read(ENV_AI_ENDPOINT)
                .map(|value| value.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_AI_ENDPOINT.to_string()),
            timeout,
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
            ai,
        })
    }
}
