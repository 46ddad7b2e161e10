//! # Depot CLI Entry Point
//!
//! Parses the command line, runs it and prints the resulting `Outcome` as
//! JSON on stdout. Logs go to stderr.
//!
//! ```bash
//! depot user login --username ann --password pw
//! depot --user 1 --role ADMIN distribute --good 1 --to 2 --quantity 10
//! RUST_LOG=debug depot stats totals --user 1 --role STAFF
//! ```
//!
//! Exit status is non-zero when the outcome is a failure.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use depot_cli::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let outcome = depot_cli::run(cli).await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=depot_db=trace` - Trace the database layer only
/// - Default: `info,depot=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,depot=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
