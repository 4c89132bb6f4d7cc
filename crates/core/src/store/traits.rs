use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use super::{deserialize_value, serialize_value, validate_key, Result};

/// Byte-level operations every backend adapter implements.
///
/// The trait is object safe so a backend chosen at runtime can be held as
/// `Box<dyn Store>`. Typed access goes through [`StoreExt`].
#[async_trait]
pub trait Store: Send + Sync {
    /// Verifies the backend is reachable and its table or namespace exists.
    async fn health(&self) -> Result<()>;

    /// Writes or overwrites a record, refreshing its expiry when a TTL is set.
    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Reads a record. Absent and expired keys are `Ok(None)`.
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Resets the expiry of an existing record to now + TTL.
    ///
    /// Succeeds without contacting the backend when the TTL is disabled, and
    /// succeeds without creating anything when the key does not exist.
    async fn update_ttl(&self, key: &str) -> Result<()>;

    /// Removes a record. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Releases backend resources. Call exactly once, after the last operation.
    async fn close(&self) -> Result<()>;
}

/// Typed access on top of [`Store`], encoding values as JSON.
#[async_trait]
pub trait StoreExt: Store {
    /// Serializes `value` and stores it under `key`.
    async fn set<V>(&self, key: &str, value: &V) -> Result<()>
    where
        V: Serialize + Sync + ?Sized,
    {
        validate_key(key)?;
        let bytes = serialize_value(value)?;
        self.set_bytes(key, bytes).await
    }

    /// Loads and deserializes the value stored under `key`.
    async fn get<V>(&self, key: &str) -> Result<Option<V>>
    where
        V: DeserializeOwned + Send,
    {
        match self.get_bytes(key).await? {
            Some(bytes) => deserialize_value(&bytes).map(Some),
            None => Ok(None),
        }
    }
}

impl<S: Store + ?Sized> StoreExt for S {}
