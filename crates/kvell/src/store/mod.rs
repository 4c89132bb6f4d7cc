//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `Store` trait
//! defined in `kvell_core::store`. Backends are selected at compile time via
//! feature flags and at runtime via [`Config::backend`].
//!
//! # Feature Flags
//!
//! - `memory` (default): process-local store, mainly for tests
//! - `dynamodb` (default): AWS DynamoDB backend using `aws-sdk-dynamodb`
//! - `redis` (default): Redis backend using `redis`
//!
//! Any combination may be enabled.
//!
//! # Examples
//!
//! Build with Redis only:
//! ```bash
//! cargo build -p kvell --no-default-features --features redis
//! ```

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "redis")]
pub mod redis_impl;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;

#[cfg(feature = "dynamodb")]
pub use dynamodb::{DynamoDbOptions, DynamoDbStore, TableCapacity};

#[cfg(feature = "redis")]
pub use redis_impl::{RedisOptions, RedisStore};

use kvell_core::{Result, Store, StoreError};

use crate::config::{BackendKind, Config};

/// Opens the backend selected by `config`.
///
/// For DynamoDB this provisions the table and its TTL setting before
/// returning.
///
/// # Errors
///
/// Returns `StoreError::Validation` if the backend was not compiled in, or
/// the backend's construction error.
pub async fn open_store(config: &Config) -> Result<Box<dyn Store>> {
    tracing::debug!(backend = %config.backend, ttl_seconds = config.ttl_seconds, "Opening store");

    match config.backend {
        #[cfg(feature = "memory")]
        BackendKind::Memory => Ok(Box::new(MemoryStore::new(config.ttl()))),

        #[cfg(feature = "dynamodb")]
        BackendKind::DynamoDb => {
            let store = DynamoDbStore::connect(dynamodb_options(config)).await?;
            Ok(Box::new(store))
        }

        #[cfg(feature = "redis")]
        BackendKind::Redis => {
            let store = RedisStore::connect(redis_options(config))?;
            Ok(Box::new(store))
        }

        #[allow(unreachable_patterns)]
        other => Err(StoreError::Validation(format!(
            "backend '{}' is not compiled in",
            other
        ))),
    }
}

#[cfg(feature = "dynamodb")]
fn dynamodb_options(config: &Config) -> DynamoDbOptions {
    let dynamodb = &config.dynamodb;
    let mut options = DynamoDbOptions::new(&dynamodb.region, &dynamodb.table_name);
    options.endpoint_url = dynamodb.endpoint_url.clone();
    options.access_key_id = dynamodb.access_key_id.clone();
    options.secret_access_key = dynamodb.secret_access_key.clone();
    options.capacity = match dynamodb.capacity_units {
        Some((read, write)) => TableCapacity::from_units(read, write),
        None => TableCapacity::OnDemand,
    };
    options.ttl = config.ttl();
    options
}

#[cfg(feature = "redis")]
fn redis_options(config: &Config) -> RedisOptions {
    let redis = &config.redis;
    let mut options = RedisOptions::new(&redis.host, redis.port);
    options.password = redis.password.clone();
    options.db = redis.db;
    options.ttl = config.ttl();
    options.reconnect_retries = redis.reconnect_retries;
    options
}
