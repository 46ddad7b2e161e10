//! Report commands. Staff and admins only.

use depot_core::{Outcome, Permission};

use crate::cli::StatsCommand;
use crate::error::CliError;
use crate::state::AppState;

pub async fn run(state: &AppState, command: StatsCommand) -> Result<Outcome, CliError> {
    state.require(Permission::ViewReports, "view statistics")?;
    let stats = state.db().stats();

    let outcome = match command {
        StatsCommand::Sales => Outcome::with_data(&stats.sales_by_branch().await?),
        StatsCommand::Distributions => Outcome::with_data(&stats.distribution_history().await?),
        StatsCommand::Inventory => Outcome::with_data(&stats.inventory_snapshot().await?),
        StatsCommand::Totals => Outcome::with_data(&stats.conservation_total().await?),
        StatsCommand::Imports => Outcome::with_data(&state.db().imports().list().await?),
    };

    Ok(outcome)
}
