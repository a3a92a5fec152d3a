//! Curator: validate learning-resource records and sync them to Notion.
//!
//! # Usage
//!
//! ```text
//! curator validate [--dir sites] [--skip-url-check] [--timeout-secs 10] [--json]
//! curator sync [--repo .] [--dir sites] [--from REV] [--to HEAD] [--dry-run]
//! curator new "<resource name>" [--dir sites]
//! ```
//!
//! A `.env` file in the working directory is loaded before arguments are
//! parsed, so every `env` fallback below can live there.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{new::NewArgs, sync::SyncArgs, validate::ValidateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "curator",
    version,
    about = "Validate learning-resource records and sync them to a Notion database",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check every record file: naming, schema, duplicates, and link liveness.
    Validate(ValidateArgs),

    /// Push records changed between two revisions to the Notion database.
    Sync(SyncArgs),

    /// Scaffold a new record file from a resource name.
    New(NewArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async move {
        match cli.command {
            Commands::Validate(args) => args.run().await,
            Commands::Sync(args) => args.run().await,
            Commands::New(args) => args.run().await,
        }
    })
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
