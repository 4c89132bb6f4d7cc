//! Store configuration loaded from environment variables.

use std::{env, fmt, str::FromStr};

use kvell_core::Ttl;
use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown backend '{0}', expected one of: memory, redis, dynamodb")]
    UnknownBackend(String),
}

/// Which storage backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Memory,
    Redis,
    DynamoDb,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
            Self::DynamoDb => "dynamodb",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            "dynamodb" | "dynamo" => Ok(Self::DynamoDb),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// DynamoDB connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbConfig {
    pub table_name: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Read/write capacity units; `None` selects on-demand billing.
    pub capacity_units: Option<(i64, i64)>,
}

/// Redis connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
    /// Connection attempts after a failed one.
    pub reconnect_retries: usize,
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: BackendKind,
    /// Record lifetime in seconds; 0 disables expiry.
    pub ttl_seconds: u64,
    pub dynamodb: DynamoDbConfig,
    pub redis: RedisConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `KVELL_BACKEND` - `memory`, `redis` or `dynamodb` (default: memory)
    /// - `KVELL_TTL_SECONDS` - Record TTL, 0 disables (default: 0)
    /// - `DYNAMODB_TABLE_NAME` - Table name (default: "kvell")
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `AWS_ENDPOINT_URL` - Custom endpoint for DynamoDB Local
    /// - `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` - Static credentials
    /// - `DYNAMODB_READ_CAPACITY` / `DYNAMODB_WRITE_CAPACITY` - Provisioned units (default: on-demand)
    /// - `REDIS_HOST` / `REDIS_PORT` - Redis server (default: localhost:6379)
    /// - `REDIS_PASSWORD` - Redis password
    /// - `REDIS_DB` - Logical database (default: 0)
    /// - `REDIS_RECONNECT_RETRIES` - Connection retries with exponential backoff (default: 6)
    ///
    /// Unparseable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `KVELL_BACKEND` names an unknown backend.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let number = |name: &str| var(name).and_then(|v| v.trim().parse::<u64>().ok());

        let backend = match var("KVELL_BACKEND") {
            Some(value) => value.parse()?,
            None => BackendKind::default(),
        };

        let capacity_units = match (
            var("DYNAMODB_READ_CAPACITY").and_then(|v| v.trim().parse().ok()),
            var("DYNAMODB_WRITE_CAPACITY").and_then(|v| v.trim().parse().ok()),
        ) {
            (None, None) => None,
            (read, write) => Some((read.unwrap_or(0), write.unwrap_or(0))),
        };

        Ok(Self {
            backend,
            ttl_seconds: number("KVELL_TTL_SECONDS").unwrap_or(0),
            dynamodb: DynamoDbConfig {
                table_name: var("DYNAMODB_TABLE_NAME").unwrap_or_else(|| "kvell".to_string()),
                region: var("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                endpoint_url: var("AWS_ENDPOINT_URL"),
                access_key_id: var("AWS_ACCESS_KEY_ID"),
                secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
                capacity_units,
            },
            redis: RedisConfig {
                host: var("REDIS_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: var("REDIS_PORT")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(6379),
                password: var("REDIS_PASSWORD"),
                db: var("REDIS_DB")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(0),
                reconnect_retries: var("REDIS_RECONNECT_RETRIES")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(6),
            },
        })
    }

    /// Get the record TTL.
    pub fn ttl(&self) -> Ttl {
        Ttl::from_secs(self.ttl_seconds)
    }

}
