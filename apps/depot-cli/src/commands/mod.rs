//! # Command Handlers
//!
//! ```text
//! commands/
//! ├── mod.rs        ◄─── dispatch + seed
//! ├── goods.rs      ◄─── goods ledger and imports
//! ├── branch.rs     ◄─── branch registry
//! ├── stock.rs      ◄─── distribute, sell, inventory
//! ├── stats.rs      ◄─── reports
//! └── user.rs       ◄─── accounts
//! ```
//!
//! Every handler takes the [`AppState`], checks the actor where the command
//! needs one, makes exactly one core call and wraps its result in an
//! [`Outcome`]. Business failures come back as `Err(CliError)` and are turned
//! into a failed outcome by the caller.
//!
//! | Command                              | Permission       |
//! |--------------------------------------|------------------|
//! | goods list/find/price, branch list, inventory | none    |
//! | goods add                            | `AddGoods`       |
//! | goods update/delete                  | `ManageGoods`    |
//! | import                               | `RecordImport`   |
//! | branch add/edit/delete               | `ManageBranches` |
//! | distribute                           | `Distribute`     |
//! | sell                                 | `RecordSale`     |
//! | stats *                              | `ViewReports`    |
//! | user add/delete/list                 | `ManageUsers`    |
//! | user promote                         | `ManageUsers`, or none while no admin exists |
//! | user passwd                          | any actor        |
//! | user register/login, seed            | none             |

pub mod branch;
pub mod goods;
pub mod stats;
pub mod stock;
pub mod user;

use depot_core::Outcome;
use depot_db::seed_sample_data;

use crate::cli::Command;
use crate::error::CliError;
use crate::state::AppState;

/// Runs one parsed command.
pub async fn dispatch(state: &AppState, command: Command) -> Result<Outcome, CliError> {
    match command {
        Command::Goods(cmd) => goods::run(state, cmd).await,
        Command::Import(args) => goods::import(state, args).await,
        Command::Branch(cmd) => branch::run(state, cmd).await,
        Command::Distribute(args) => stock::distribute(state, args).await,
        Command::Sell(args) => stock::sell(state, args).await,
        Command::Inventory(args) => stock::inventory(state, args).await,
        Command::Stats(cmd) => stats::run(state, cmd).await,
        Command::User(cmd) => user::run(state, cmd).await,
        Command::Seed => {
            let report = seed_sample_data(state.db()).await?;
            Ok(Outcome::with_data(&report))
        }
    }
}
