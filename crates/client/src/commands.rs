//! Command execution against an open store.

use kvell_core::{Store, StoreExt};
use serde_json::Value;

use crate::cli::Commands;
use crate::error::{ClientError, Result};
use crate::output::parse_input;

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    Stored { key: String },
    Touched { key: String },
    Deleted { key: String },
    Healthy,
}

/// Runs `command` against `store`.
///
/// # Errors
///
/// Returns `ClientError::NotFound` when `get` finds nothing, or the store error.
pub async fn execute(store: &dyn Store, command: Commands) -> Result<Outcome> {
    match command {
        Commands::Get { key } => match store.get::<Value>(&key).await? {
            Some(value) => Ok(Outcome::Value(value)),
            None => Err(ClientError::NotFound { key }),
        },
        Commands::Set { key, value } => {
            store.set(&key, &parse_input(&value)).await?;
            Ok(Outcome::Stored { key })
        }
        Commands::Touch { key } => {
            store.update_ttl(&key).await?;
            Ok(Outcome::Touched { key })
        }
        Commands::Delete { key } => {
            store.delete(&key).await?;
            Ok(Outcome::Deleted { key })
        }
        Commands::Health => {
            store.health().await?;
            Ok(Outcome::Healthy)
        }
    }
}
