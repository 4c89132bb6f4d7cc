//! Key-value store adapters for DynamoDB, Redis and process memory.
//!
//! All backends implement [`kvell_core::Store`]; pick one at runtime with
//! [`open_store`] or construct an adapter directly.

pub mod config;
pub mod store;

pub use config::{BackendKind, Config, ConfigError};
pub use kvell_core::{Result, Store, StoreError, StoreExt, Ttl};
pub use store::open_store;
