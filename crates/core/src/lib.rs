//! Backend-agnostic contract for kvell stores.
//!
//! Adapters live in the `kvell` crate; this crate only holds the pieces they
//! share: the [`store::Store`] trait, its error type, the JSON payload codec
//! and the [`ttl::Ttl`] value type.

pub mod store;
pub mod ttl;

pub use store::{Result, Store, StoreError, StoreExt};
pub use ttl::Ttl;
