//! kvell_client - CLI for kvell stores.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use error::{ClientError, Result};
