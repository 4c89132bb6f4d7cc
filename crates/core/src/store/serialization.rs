//! JSON codec for stored payloads.
//!
//! Every adapter stores the JSON encoding of the caller's value, so records
//! written by one backend are readable by another and easy to inspect.

use serde::{de::DeserializeOwned, Serialize};

use super::{Result, StoreError};

/// Serializes a value to JSON bytes.
pub fn serialize_value<V: Serialize + ?Sized>(value: &V) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Deserializes JSON bytes into a value.
pub fn deserialize_value<V: DeserializeOwned>(bytes: &[u8]) -> Result<V> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Deserialization(e.to_string()))
}
