//! Redis storage backend implementation.
//!
//! Stores JSON payloads as plain string values with native `EX` expiry, over
//! a lazily established `redis::aio::ConnectionManager`.

mod connection;
mod error;
mod options;
mod reply;
mod store;

pub use options::RedisOptions;
pub use store::RedisStore;
