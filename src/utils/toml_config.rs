//! TOML-based configuration for Bookshelf
//!
//! The server is configured through a single TOML file (`bookshelf.toml`).
//! Secrets are never stored in the file itself: the `[auth]` section names the
//! environment variable that holds the JWT signing key.
//!
//! The configuration is loaded once at startup and handed to the components
//! that need it; nothing re-reads it while the server is running.

use crate::auth::ownership::BookOwnershipPolicy;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Minimum accepted length (in bytes) of the JWT signing secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_LIFETIME_MINUTES: i64 = 60 * 24 * 365;

/// Root configuration structure loaded from bookshelf.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookshelfConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    /// Authorization policy switches
    #[serde(default)]
    pub policy: PolicyConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Origins allowed to call the API from a browser
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:4200".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            cors_origins: default_cors_origins(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    /// `iss` claim written into and required from every token
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// `aud` claim written into and required from every token
    #[serde(default = "default_audience")]
    pub audience: String,

    #[serde(default = "default_token_lifetime_minutes")]
    pub token_lifetime_minutes: i64,
}

fn default_jwt_secret_env() -> String {
    "BOOKSHELF_JWT_SECRET".to_string()
}

fn default_issuer() -> String {
    "bookshelf-api".to_string()
}

fn default_audience() -> String {
    "bookshelf-web".to_string()
}

fn default_token_lifetime_minutes() -> i64 {
    180
}

impl AuthConfig {
    /// `token_lifetime_minutes` as a duration, if it lies within 1 minute and
    /// [`MAX_TOKEN_LIFETIME_MINUTES`].
    pub fn token_lifetime(&self) -> Result<Duration, ConfigError> {
        let minutes = self.token_lifetime_minutes;
        if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&minutes) {
            return Err(ConfigError::ValidationError(format!(
                "auth.token_lifetime_minutes must be between 1 and {}, got {}",
                MAX_TOKEN_LIFETIME_MINUTES, minutes
            )));
        }

        Duration::try_minutes(minutes).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "auth.token_lifetime_minutes is out of range: {}",
                minutes
            ))
        })
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            issuer: default_issuer(),
            audience: default_audience(),
            token_lifetime_minutes: default_token_lifetime_minutes(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Insert the demo user, books and quotes into an empty database
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

fn default_database_url() -> String {
    "./data/bookshelf.db".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            seed_demo_data: true,
        }
    }
}

// ============= Policy Configuration =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// What happens when a user edits or deletes a book somebody else added
    #[serde(default)]
    pub book_ownership: BookOwnershipPolicy,
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl BookshelfConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Parse configuration text without touching the environment.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        if self.auth.issuer.trim().is_empty() || self.auth.audience.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.issuer and auth.audience must not be empty".to_string(),
            ));
        }

        self.auth.token_lifetime()?;

        if self.database.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url must not be empty".to_string(),
            ));
        }

        let secret = self.jwt_secret()?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ValidationError(format!(
                "the secret in '{}' must be at least {} bytes",
                self.auth.jwt_secret_env, MIN_SECRET_LEN
            )));
        }

        Ok(())
    }

    /// Get the JWT secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        std::env::var(&self.auth.jwt_secret_env)
            .map_err(|_| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))
    }

    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
