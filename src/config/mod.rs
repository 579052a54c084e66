//! Bootstrap configuration, read once at startup.
//!
//! The configuration is a JSON document:
//!
//! ```json
//! {
//!   "admin": { "identity": 1001, "first_name": "Ada", "last_name": "Lovelace" },
//!   "database": { "url": "postgres://tasker@localhost/tasker", "pool_size": 4 }
//! }
//! ```
//!
//! `TASKER_ADMIN_ID` and `TASKER_DATABASE_URL` override the file. Without a
//! database URL the in-memory adapters are used.

use crate::user::domain::{DisplayName, UserDomainError, UserId};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable overriding the admin identity.
pub const ADMIN_ID_ENV: &str = "TASKER_ADMIN_ID";
/// Environment variable overriding the database URL.
pub const DATABASE_URL_ENV: &str = "TASKER_DATABASE_URL";

const DEFAULT_POOL_SIZE: u32 = 4;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The path has no file name or is not valid UTF-8.
    #[error("invalid configuration path: {0}")]
    InvalidPath(String),
    /// The file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// An environment override could not be interpreted.
    #[error("invalid value {value:?} for {key}")]
    InvalidOverride {
        /// Variable name.
        key: &'static str,
        /// Rejected value.
        value: String,
    },
    /// The admin identity is not a valid platform identity.
    #[error("invalid admin identity: {0}")]
    InvalidAdmin(#[from] UserDomainError),
    /// The pool must hold at least one connection.
    #[error("database pool size must be positive")]
    EmptyPool,
}

/// The bootstrap administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Platform identity of the admin.
    pub identity: i64,
    /// Given name used when the admin record is created.
    #[serde(default)]
    pub first_name: String,
    /// Family name used when the admin record is created.
    #[serde(default)]
    pub last_name: String,
}

/// Storage connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` URL; `None` selects in-memory storage.
    #[serde(default)]
    pub url: Option<String>,
    /// Maximum pooled connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

const fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

/// Complete bootstrap configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Bootstrap administrator.
    pub admin: AdminConfig,
    /// Storage settings.
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or a validation
    /// error from [`Self::validate`].
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, applies process environment overrides, and validates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] or [`ConfigError::Read`] when the
    /// file cannot be read, plus the errors of [`Self::from_json`] and
    /// [`Self::with_overrides`].
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let source = read_file(path)?;
        let config: Self = serde_json::from_str(&source)?;
        let overridden = config.with_overrides(|key| std::env::var(key).ok())?;
        overridden.validate()?;
        Ok(overridden)
    }

    /// Applies environment overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] when the admin identity
    /// override is not an integer.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = lookup(ADMIN_ID_ENV) {
            self.admin.identity =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidOverride {
                        key: ADMIN_ID_ENV,
                        value: raw.clone(),
                    })?;
        }
        if let Some(url) = lookup(DATABASE_URL_ENV) {
            self.database.url = Some(url).filter(|value| !value.trim().is_empty());
        }
        Ok(self)
    }

    /// Checks values that JSON alone cannot constrain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAdmin`] for a non-positive admin
    /// identity and [`ConfigError::EmptyPool`] for a zero pool size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.admin_identity()?;
        if self.database.pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        Ok(())
    }

    /// Returns the admin identity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAdmin`] when the identity is not
    /// positive.
    pub fn admin_identity(&self) -> Result<UserId, ConfigError> {
        Ok(UserId::new(self.admin.identity)?)
    }

    /// Returns the admin display name.
    #[must_use]
    pub fn admin_name(&self) -> DisplayName {
        DisplayName::new(self.admin.first_name.clone(), self.admin.last_name.clone())
    }
}

fn read_file(path: &str) -> Result<String, ConfigError> {
    let std_path = Path::new(path);
    let file_name = std_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ConfigError::InvalidPath(path.to_owned()))?;
    let parent = std_path
        .parent()
        .and_then(Path::to_str)
        .filter(|dir| !dir.is_empty())
        .unwrap_or(".");
    let read_error = |source| ConfigError::Read {
        path: path.to_owned(),
        source,
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    dir.read_to_string(file_name).map_err(read_error)
}
