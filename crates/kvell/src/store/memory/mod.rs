//! In-memory storage backend.
//!
//! Records live in a `HashMap` wrapped in `Arc<RwLock<_>>` and are lost when
//! the store is dropped. Useful for tests and local development.
//!
//! # Example
//!
//! ```rust,ignore
//! use kvell::store::memory::MemoryStore;
//! use kvell_core::{StoreExt, Ttl};
//!
//! let store = MemoryStore::new(Ttl::from_secs(20));
//! store.set("greeting", "hello").await?;
//! ```

mod store;

pub use store::MemoryStore;
