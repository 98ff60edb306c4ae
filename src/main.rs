//! Cumulus - User, group and session management bridge
//!
//! Opens the storage engine chosen with `--storage` (or `CUMULUS_STORAGE`)
//! and runs one subcommand against it; without a subcommand the
//! demonstration sequence runs.

use anyhow::Context;
use clap::Parser;
use cumulus::commands::{self, Command};
use cumulus::config::StorageArgs;
use cumulus::{APP_NAME, APP_VERSION};
use cumulus_core::storage::{Storage, UserStorage};

// =============================================================================
// CLI
// =============================================================================

/// Cumulus - user, group and session management bridge
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "Manage users, groups and sessions across storage engines")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    storage: StorageArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,sqlx=warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    tracing::info!("Cumulus v{}", APP_VERSION);

    let config = cli.storage.to_config()?;
    let storage = Storage::connect(&config)
        .await
        .with_context(|| format!("failed to open {} storage", config.engine_name()))?;

    let result = commands::run(cli.command.unwrap_or(Command::Demo), &storage).await;

    if let Err(e) = storage.close().await {
        tracing::warn!(error = %e, "failed to close storage");
    }

    result
}
