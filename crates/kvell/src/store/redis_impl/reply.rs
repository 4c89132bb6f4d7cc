//! Interpretation of untyped `GET` replies.

use kvell_core::{Result, StoreError};
use redis::Value;

/// Shape of a reply to `GET`.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Bytes(Vec<u8>),
    Text(String),
    /// Nil: the key does not exist or has expired.
    Absent,
    /// Error reported by the server.
    Error(String),
    /// Any other reply shape.
    Unexpected(String),
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        match value {
            Value::BulkString(bytes) => Reply::Bytes(bytes),
            Value::SimpleString(text) => Reply::Text(text),
            Value::Nil => Reply::Absent,
            other => Reply::Unexpected(format!("{:?}", other)),
        }
    }
}

impl Reply {
    /// Classifies a failed command: server-reported errors carry an error code,
    /// transport failures do not and are left to the caller.
    pub fn from_error(err: &redis::RedisError) -> Option<Self> {
        err.code().map(|_| Reply::Error(err.to_string()))
    }

    /// Converts the reply into the stored payload.
    pub fn into_payload(self) -> Result<Option<Vec<u8>>> {
        match self {
            Reply::Bytes(bytes) => Ok(Some(bytes)),
            Reply::Text(text) => Ok(Some(text.into_bytes())),
            Reply::Absent => Ok(None),
            Reply::Error(message) => Err(StoreError::Backend(message)),
            Reply::Unexpected(shape) => Err(StoreError::Backend(format!(
                "Redis returned an undefined reply: {shape}"
            ))),
        }
    }
}
