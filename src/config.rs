//! Storage configuration.
//!
//! The configuration record has a closed field set. It derives
//! [`serde::Deserialize`] so the host server can embed it in its own
//! configuration file, and [`StorageConfig::from_env`] reads the same fields
//! from `PARLEY_DB_*` environment variables.
//!
//! # Environment Variables
//!
//! - `PARLEY_DB_ENGINE`: `postgres` (default) or `sqlite`
//! - `PARLEY_DB_HOST`, `PARLEY_DB_PORT`: server address
//! - `PARLEY_DB_NAME`: database name (file path for `sqlite`)
//! - `PARLEY_DB_USERNAME`, `PARLEY_DB_PASSWORD`: optional credentials
//! - `PARLEY_DB_POOL_SIZE`: connection pool size, default 5

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Default number of pooled connections.
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// Relational engine backing the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Networked `PostgreSQL` server.
    #[default]
    Postgres,
    /// Embedded file-based store; needs no host or port.
    Sqlite,
}

impl EngineKind {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }

    /// Whether the engine is an embedded file store.
    #[must_use]
    pub const fn is_embedded(self) -> bool {
        matches!(self, Self::Sqlite)
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for EngineKind {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(ConfigError::UnknownEngine(value.to_owned())),
        }
    }
}

/// Errors raised while validating configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field was not provided.
    #[error("must provide {0}")]
    Missing(&'static str),

    /// The engine name is not recognised.
    #[error("unknown storage engine: {0}")]
    UnknownEngine(String),

    /// The engine is recognised but has no pooled adapter.
    #[error("storage engine {0} has no pooled adapter")]
    UnsupportedEngine(EngineKind),

    /// A numeric field could not be parsed.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected raw value.
        value: String,
    },

    /// The connection URL could not be rendered.
    #[error("invalid connection url: {0}")]
    InvalidUrl(String),
}

/// Connection settings for the relational store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Engine kind.
    pub engine: EngineKind,
    /// Server host; required unless the engine is embedded.
    pub host: Option<String>,
    /// Server port; required unless the engine is embedded.
    pub port: Option<u16>,
    /// Database name.
    pub database: String,
    /// Login name; dropped when blank.
    pub username: Option<String>,
    /// Login password; dropped when blank.
    pub password: Option<String>,
    /// Number of pooled connections; `None` uses [`DEFAULT_POOL_SIZE`].
    pub pool_size: Option<u32>,
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

impl StorageConfig {
    /// Creates a `PostgreSQL` configuration for the given server and database.
    #[must_use]
    pub fn postgres(host: impl Into<String>, port: u16, database: impl Into<String>) -> Self {
        Self {
            engine: EngineKind::Postgres,
            host: Some(host.into()),
            port: Some(port),
            database: database.into(),
            ..Self::default()
        }
    }

    /// Sets the login credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the pool size.
    #[must_use]
    pub const fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = Some(pool_size);
        self
    }

    /// Loads configuration from `PARLEY_DB_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value cannot be parsed or required
    /// fields are missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value cannot be parsed or required
    /// fields are missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let engine = lookup("PARLEY_DB_ENGINE")
            .map(|raw| EngineKind::try_from(raw.as_str()))
            .transpose()?
            .unwrap_or_default();
        let port = lookup("PARLEY_DB_PORT")
            .map(|raw| parse_field("port", &raw))
            .transpose()?;
        let pool_size = lookup("PARLEY_DB_POOL_SIZE")
            .map(|raw| parse_field("pool_size", &raw))
            .transpose()?;

        let config = Self {
            engine,
            host: lookup("PARLEY_DB_HOST"),
            port,
            database: lookup("PARLEY_DB_NAME").unwrap_or_default(),
            username: lookup("PARLEY_DB_USERNAME"),
            password: lookup("PARLEY_DB_PASSWORD"),
            pool_size,
        };
        config.validate()
    }

    /// Checks required fields and drops blank credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the database name is empty, or
    /// when host or port are absent for a networked engine.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::Missing("database"));
        }
        if !self.engine.is_embedded() {
            if blank(self.host.as_deref()) {
                return Err(ConfigError::Missing("host"));
            }
            if self.port.is_none() {
                return Err(ConfigError::Missing("port"));
            }
        }
        if blank(self.username.as_deref()) {
            self.username = None;
        }
        if blank(self.password.as_deref()) {
            self.password = None;
        }
        if self.pool_size == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "pool_size",
                value: "0".to_owned(),
            });
        }
        Ok(self)
    }

    /// Returns the effective pool size.
    #[must_use]
    pub fn pool_size(&self) -> u32 {
        self.pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Renders the connection URL for the configured engine.
    ///
    /// Credentials are percent-encoded and left out entirely when blank.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when required fields are missing or the URL
    /// cannot be assembled.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        let config = self.clone().validate()?;
        if config.engine.is_embedded() {
            return Ok(config.database);
        }

        let host = config.host.as_deref().unwrap_or_default();
        let port = config.port.unwrap_or_default();
        let mut url = Url::parse(&format!("postgres://{host}:{port}"))
            .map_err(|err| ConfigError::InvalidUrl(err.to_string()))?;
        url.set_path(&config.database);
        if let Some(username) = config.username.as_deref() {
            url.set_username(username)
                .map_err(|()| ConfigError::InvalidUrl("username rejected".to_owned()))?;
        }
        if let Some(password) = config.password.as_deref() {
            url.set_password(Some(password))
                .map_err(|()| ConfigError::InvalidUrl("password rejected".to_owned()))?;
        }
        Ok(url.into())
    }
}

fn blank(value: Option<&str>) -> bool {
    value.is_none_or(|inner| inner.trim().is_empty())
}

fn parse_field<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        value: raw.to_owned(),
    })
}
