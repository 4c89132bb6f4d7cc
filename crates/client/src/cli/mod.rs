//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use kvell::{BackendKind, Config};

use crate::error::Result;

/// Read and write records in a kvell store.
#[derive(Debug, Parser)]
#[command(name = "kvell")]
#[command(about = "Read and write records in a kvell store", long_about = None)]
pub struct Cli {
    /// Storage backend; overrides `KVELL_BACKEND`.
    #[arg(long, value_parser = parse_backend)]
    pub backend: Option<BackendKind>,

    /// Record TTL in seconds, 0 disables; overrides `KVELL_TTL_SECONDS`.
    #[arg(long)]
    pub ttl_seconds: Option<u64>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long, short)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON output.
    Json,
    /// Indented JSON output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the value stored under a key.
    Get { key: String },
    /// Store a value. Parsed as JSON, stored as a string otherwise.
    Set { key: String, value: String },
    /// Reset a key's expiry without changing its value.
    Touch { key: String },
    /// Remove a key.
    Delete { key: String },
    /// Check that the backend is reachable.
    Health,
}

impl Cli {
    /// Loads configuration from the environment and applies flag overrides.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the environment names an unknown backend.
    pub fn config(&self) -> Result<Config> {
        Ok(self.apply_overrides(Config::from_env()?))
    }

    /// Flags take precedence over environment variables.
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(ttl_seconds) = self.ttl_seconds {
            config.ttl_seconds = ttl_seconds;
        }
        config
    }
}

fn parse_backend(value: &str) -> std::result::Result<BackendKind, String> {
    value.parse().map_err(|e: kvell::ConfigError| e.to_string())
}
