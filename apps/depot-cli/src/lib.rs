//! # Depot CLI Library
//!
//! Thin command-line collaborator over `depot-core` and `depot-db`.
//!
//! ## Module Organization
//! ```text
//! depot_cli/
//! ├── lib.rs          ◄─── You are here (run)
//! ├── cli.rs          ◄─── clap command surface
//! ├── config.rs       ◄─── Environment configuration
//! ├── state.rs        ◄─── Database + actor, role gating
//! ├── commands/       ◄─── One handler per subcommand
//! └── error.rs        ◄─── CliError → Outcome
//! ```
//!
//! ## Run Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Load AppConfig (--db, then env)                                     │
//! │  2. Open Database, run migrations                                       │
//! │  3. Build AppState from --user/--role                                   │
//! │  4. Dispatch the command                                                │
//! │  5. Close the pool, return the Outcome                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use tracing::{debug, info};

use depot_core::Outcome;
use depot_db::Database;

use cli::Cli;
use config::AppConfig;
use error::CliError;
use state::AppState;

/// Runs a parsed command line to completion.
///
/// Every failure, including configuration and connection errors, is folded
/// into the returned [`Outcome`].
pub async fn run(cli: Cli) -> Outcome {
    match execute(cli).await {
        Ok(outcome) => outcome,
        Err(err) => err.into(),
    }
}

async fn execute(cli: Cli) -> Result<Outcome, CliError> {
    let actor = cli.actor().map_err(CliError::Usage)?;

    let config = AppConfig::load(cli.db.clone())?;
    info!(path = %config.database_path.display(), "Opening store");

    let db = Database::new(config.db_config()).await?;
    let state = AppState::new(db, actor);

    debug!(command = ?cli.command, "Dispatching");
    let outcome = commands::dispatch(&state, cli.command).await;

    state.db().close().await;
    outcome
}
