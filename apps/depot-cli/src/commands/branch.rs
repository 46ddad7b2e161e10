//! Branch registry commands. Changes are admin-only.

use depot_core::{Outcome, Permission};

use crate::cli::BranchCommand;
use crate::error::CliError;
use crate::state::AppState;

pub async fn run(state: &AppState, command: BranchCommand) -> Result<Outcome, CliError> {
    let branches = state.db().branches();

    match command {
        BranchCommand::List => Ok(Outcome::with_data(&branches.list().await?)),

        BranchCommand::Add { name, location } => {
            state.require(Permission::ManageBranches, "add branches")?;
            Ok(Outcome::with_data(&branches.add(&name, &location).await?))
        }

        BranchCommand::Edit {
            branch,
            name,
            location,
        } => {
            state.require(Permission::ManageBranches, "edit branches")?;
            Ok(Outcome::with_data(
                &branches.edit(branch, &name, &location).await?,
            ))
        }

        BranchCommand::Delete { branch } => {
            state.require(Permission::ManageBranches, "delete branches")?;
            branches.delete(branch).await?;
            Ok(Outcome::ok())
        }
    }
}
