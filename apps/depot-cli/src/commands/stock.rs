//! # Stock Movement Commands
//!
//! `distribute` and `sell` hand the actor to the engines for attribution.
//! `inventory` is read-only:
//!
//! | Flags                 | Shows                              |
//! |-----------------------|------------------------------------|
//! | `--branch B`          | every stock row of branch B        |
//! | `--good G`            | warehouse quantity of G            |
//! | `--good G --branch B` | quantity of G at B                 |

use depot_core::{DistributionRequest, Outcome, Permission, SaleRequest};

use crate::cli::{DistributeArgs, InventoryArgs, SellArgs};
use crate::error::CliError;
use crate::state::AppState;

pub async fn distribute(state: &AppState, args: DistributeArgs) -> Result<Outcome, CliError> {
    let actor = state.require(Permission::Distribute, "distribute goods")?;

    let request = DistributionRequest {
        good_id: args.good,
        from_branch_id: args.from,
        to_branch_id: args.to,
        quantity: args.quantity,
    };

    let receipt = state.db().distributions().distribute(request, &actor).await?;
    Ok(Outcome::with_data(&receipt))
}

pub async fn sell(state: &AppState, args: SellArgs) -> Result<Outcome, CliError> {
    let actor = state.require(Permission::RecordSale, "record sales")?;

    let request = SaleRequest {
        good_id: args.good,
        branch_id: args.branch,
        quantity: args.quantity,
    };

    let receipt = state.db().sales().record_sale(request, &actor).await?;
    Ok(Outcome::with_data(&receipt))
}

pub async fn inventory(state: &AppState, args: InventoryArgs) -> Result<Outcome, CliError> {
    match (args.good, args.branch) {
        (Some(good), branch) => {
            let level = state.db().goods().stock_level(good, branch).await?;
            Ok(Outcome::with_data(&level))
        }
        (None, Some(branch)) => {
            let rows = state.db().inventory().list_for_branch(branch).await?;
            Ok(Outcome::with_data(&rows))
        }
        (None, None) => Err(CliError::Usage(
            "pass --branch, --good, or both".to_string(),
        )),
    }
}
