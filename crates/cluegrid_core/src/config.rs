//! Session configuration loaded from environment variables.
//!
//! # Responsibility
//! - Read `CLUEGRID_*` variables and validate each one.
//! - Provide defaults so an empty environment yields a usable config.
//!
//! # Invariants
//! - Every rejected value is reported with the variable name that held it.
//! - Loading never touches the network or the file system.

use crate::logging::{default_log_level, normalize_level};
use crate::sync::share::Role;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_SHARE_BASE_URL: &str = "CLUEGRID_SHARE_BASE_URL";
pub const ENV_ROLE: &str = "CLUEGRID_ROLE";
pub const ENV_SHARE_ID_ATTEMPTS: &str = "CLUEGRID_SHARE_ID_ATTEMPTS";
pub const ENV_LOG_LEVEL: &str = "CLUEGRID_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CLUEGRID_LOG_DIR";
pub const ENV_DB_PATH: &str = "CLUEGRID_DB_PATH";

const DEFAULT_SHARE_ID_ATTEMPTS: u8 = 5;
const MAX_SHARE_ID_ATTEMPTS: u8 = 20;

static BASE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^\s?#]+$").expect("valid base url regex")
});

/// Configuration rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl ConfigError {
    fn new(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            key,
            message: message.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.key, self.message)
    }
}

impl Error for ConfigError {}

/// Runtime settings for one board session and its host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Origin the share link is built on; bare ids are shared when `None`.
    pub share_base_url: Option<String>,
    /// Role of the local participant, embedded in share links.
    pub role: Role,
    /// How many generated ids `share_board` tries before giving up.
    pub share_id_attempts: u8,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            share_base_url: None,
            role: Role::Giver,
            share_id_attempts: DEFAULT_SHARE_ID_ATTEMPTS,
            log_level: default_log_level(),
            log_dir: None,
            db_path: None,
        }
    }
}

impl SyncConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(url) = read(ENV_SHARE_BASE_URL) {
            if !BASE_URL_RE.is_match(&url) {
                return Err(ConfigError::new(
                    ENV_SHARE_BASE_URL,
                    format!("expected an http(s) URL without query or fragment, got `{url}`"),
                ));
            }
            config.share_base_url = Some(url.trim_end_matches('/').to_string());
        }

        if let Some(role) = read(ENV_ROLE) {
            config.role = Role::parse(&role)
                .ok_or_else(|| ConfigError::new(ENV_ROLE, format!("unknown role `{role}`")))?;
        }

        if let Some(attempts) = read(ENV_SHARE_ID_ATTEMPTS) {
            config.share_id_attempts = attempts
                .parse::<u8>()
                .ok()
                .filter(|value| (1..=MAX_SHARE_ID_ATTEMPTS).contains(value))
                .ok_or_else(|| {
                    ConfigError::new(
                        ENV_SHARE_ID_ATTEMPTS,
                        format!("expected 1..={MAX_SHARE_ID_ATTEMPTS}, got `{attempts}`"),
                    )
                })?;
        }

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level =
                normalize_level(&level).map_err(|err| ConfigError::new(ENV_LOG_LEVEL, err))?;
        }

        if let Some(dir) = read(ENV_LOG_DIR) {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError::new(
                    ENV_LOG_DIR,
                    format!("must be an absolute path, got `{}`", dir.display()),
                ));
            }
            config.log_dir = Some(dir);
        }

        config.db_path = read(ENV_DB_PATH).map(PathBuf::from);

        Ok(config)
    }
}
