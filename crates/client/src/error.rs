//! Client error types.

use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Store(#[from] kvell_core::StoreError),

    #[error(transparent)]
    Config(#[from] kvell::ConfigError),

    #[error("Key not found: {key}")]
    NotFound { key: String },
}
