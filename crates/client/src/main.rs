//! kvell CLI entry point.

use anyhow::Context;
use clap::Parser;
use kvell::open_store;
use kvell_client::cli::Cli;
use kvell_client::commands::{execute, Outcome};
use kvell_client::output::format_value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kvell=info,kvell_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config()?;

    let store = open_store(&config)
        .await
        .with_context(|| format!("Failed to open {} store", config.backend))?;

    let result = execute(store.as_ref(), cli.command).await;
    if let Err(e) = store.close().await {
        tracing::warn!(error = %e, "Failed to close store");
    }

    match result? {
        Outcome::Value(value) => println!("{}", format_value(&value, cli.format)),
        Outcome::Stored { key } if !cli.quiet => println!("Stored {}", key),
        Outcome::Touched { key } if !cli.quiet => println!("Refreshed TTL of {}", key),
        Outcome::Deleted { key } if !cli.quiet => println!("Deleted {}", key),
        Outcome::Healthy if !cli.quiet => println!("{} store is healthy", config.backend),
        _ => {}
    }

    Ok(())
}
