/**
 * Server Configuration
 *
 * Settings for the HTTP server, the store and token signing.
 *
 * # Configuration Sources
 *
 * `ServerConfig::from_env` reads environment variables (after `dotenv` has
 * loaded `.env`, see the binary), falling back to development defaults:
 *
 * | Variable                   | Default                    |
 * |----------------------------|----------------------------|
 * | `DATABASE_URL`             | unset: in-memory store     |
 * | `DATABASE_MAX_CONNECTIONS` | 10                         |
 * | `JWT_SECRET`               | development secret (warns) |
 * | `SERVER_PORT` or `PORT`    | 5000                       |
 * | `STATIC_DIR`               | `client`                   |
 * | `BCRYPT_COST`              | `bcrypt::DEFAULT_COST`     |
 *
 * Tests build configs directly with `ServerConfig::builder()`.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Secret used when `JWT_SECRET` is not set. Never deploy with it.
pub const DEVELOPMENT_JWT_SECRET: &str = "stanza-development-secret-change-me";

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "client";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL connection string; `None` selects the in-memory store
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    pub port: u16,
    /// Directory served for every non-API path
    pub static_dir: PathBuf,
    pub bcrypt_cost: u32,
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut builder = Self::builder();

        if let Some(url) = value("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(raw) = value("DATABASE_MAX_CONNECTIONS") {
            builder = builder.max_connections(parse("DATABASE_MAX_CONNECTIONS", &raw)?);
        }
        match value("JWT_SECRET") {
            Some(secret) => builder = builder.jwt_secret(secret),
            None => tracing::warn!("JWT_SECRET not set. Using the development secret."),
        }
        if let Some(raw) = value("SERVER_PORT") {
            builder = builder.port(parse("SERVER_PORT", &raw)?);
        } else if let Some(raw) = value("PORT") {
            builder = builder.port(parse("PORT", &raw)?);
        }
        if let Some(dir) = value("STATIC_DIR") {
            builder = builder.static_dir(dir);
        }
        if let Some(raw) = value("BCRYPT_COST") {
            builder = builder.bcrypt_cost(parse("BCRYPT_COST", &raw)?);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                name: "BCRYPT_COST",
                value: self.bcrypt_cost.to_string(),
            });
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                name: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
    })
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    database_url: Option<String>,
    max_connections: Option<u32>,
    jwt_secret: Option<String>,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
    bcrypt_cost: Option<u32>,
}

impl ServerConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let defaults = ServerConfig::default();
        let config = ServerConfig {
            database_url: self.database_url,
            max_connections: self.max_connections.unwrap_or(defaults.max_connections),
            jwt_secret: self.jwt_secret.unwrap_or(defaults.jwt_secret),
            port: self.port.unwrap_or(defaults.port),
            static_dir: self.static_dir.unwrap_or(defaults.static_dir),
            bcrypt_cost: self.bcrypt_cost.unwrap_or(defaults.bcrypt_cost),
        };
        config.validate()?;
        Ok(config)
    }
}
