//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of the `Store` trait
//! using `aws-sdk-dynamodb`. Records live in a single table keyed by `k`,
//! with the payload in `v` and an absolute expiry in `unixtime`.

mod client;
mod conversions;
mod error;
mod planning;
mod provisioning;
mod store;

pub use client::{DynamoDbOptions, TableCapacity};
pub use store::DynamoDbStore;
