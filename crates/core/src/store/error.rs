use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Rejected before any backend call (empty key, invalid configuration).
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// A table or namespace the store depends on does not exist.
    ///
    /// A missing key is never reported this way; `get` returns `None` instead.
    #[error("{resource} not found: {name}")]
    NotFound {
        resource: &'static str,
        name: String,
    },
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
