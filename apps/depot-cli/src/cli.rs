//! # Command Surface
//!
//! One subcommand per screen of the inventory workflow.
//!
//! ```text
//! depot [--db PATH] [--user ID --role ROLE] <command>
//!
//!   goods       add | list | find | price | update | delete
//!   import      record a procurement into the warehouse
//!   branch      add | list | edit | delete
//!   distribute  warehouse or branch → branch
//!   sell        from a branch's stock
//!   inventory   branch rows or a single stock level
//!   stats       sales | distributions | inventory | totals | imports
//!   user        register | login | add | passwd | promote | delete | list
//!   seed        sample branches and goods
//! ```
//!
//! `--user` and `--role` describe the actor performing the command. They are
//! trusted as given (obtain them from `user login`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use depot_core::{ActorContext, Money, Role};

#[derive(Debug, Parser)]
#[command(name = "depot")]
#[command(about = "Multi-branch goods inventory, distribution and sales", long_about = None)]
pub struct Cli {
    /// Database file (overrides DEPOT_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Id of the user performing the command
    #[arg(long, global = true)]
    pub user: Option<i64>,

    /// Role of the user performing the command (ADMIN, STAFF, USER)
    #[arg(long, global = true, value_parser = parse_role)]
    pub role: Option<Role>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The actor described by `--user`/`--role`, if both were given.
    ///
    /// Only one of the two is a usage error.
    pub fn actor(&self) -> Result<Option<ActorContext>, String> {
        match (self.user, self.role) {
            (Some(user_id), Some(role)) => Ok(Some(ActorContext::new(user_id, role))),
            (None, None) => Ok(None),
            _ => Err("--user and --role must be given together".to_string()),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Warehouse goods
    #[command(subcommand)]
    Goods(GoodsCommand),

    /// Record an import into the warehouse
    Import(ImportArgs),

    /// Branch registry
    #[command(subcommand)]
    Branch(BranchCommand),

    /// Move stock to a branch
    Distribute(DistributeArgs),

    /// Sell from a branch
    Sell(SellArgs),

    /// Show branch inventory or one stock level
    Inventory(InventoryArgs),

    /// Reports
    #[command(subcommand)]
    Stats(StatsCommand),

    /// Accounts
    #[command(subcommand)]
    User(UserCommand),

    /// Insert sample branches and goods when absent
    Seed,
}

#[derive(Debug, Subcommand)]
pub enum GoodsCommand {
    /// Add a good, or increase its quantity if the name exists
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quantity: i64,
        #[arg(long, value_parser = parse_money)]
        price: Money,
    },

    /// All goods
    List,

    /// Case-insensitive lookup by name
    Find {
        #[arg(long)]
        name: String,
    },

    /// Unit price of a good
    Price {
        #[arg(long)]
        good: i64,
    },

    /// Rename and reprice a good
    Update {
        #[arg(long)]
        good: i64,
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = parse_money)]
        price: Money,
    },

    /// Delete a good with its inventory, distributions and sales
    Delete {
        #[arg(long)]
        good: i64,
    },
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[arg(long)]
    pub good: i64,
    #[arg(long)]
    pub quantity: i64,
    /// Purchase cost per unit
    #[arg(long, value_parser = parse_money)]
    pub unit_cost: Money,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: String,
    #[arg(long)]
    pub supplier: String,
    /// New selling price of the good
    #[arg(long, value_parser = parse_money)]
    pub sale_price: Money,
}

#[derive(Debug, Subcommand)]
pub enum BranchCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
    },

    List,

    Edit {
        #[arg(long)]
        branch: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
    },

    /// Delete a branch with its inventory, sales and incoming distributions
    Delete {
        #[arg(long)]
        branch: i64,
    },
}

#[derive(Debug, Args)]
pub struct DistributeArgs {
    #[arg(long)]
    pub good: i64,
    /// Source branch; the warehouse when omitted
    #[arg(long)]
    pub from: Option<i64>,
    #[arg(long)]
    pub to: i64,
    #[arg(long)]
    pub quantity: i64,
}

#[derive(Debug, Args)]
pub struct SellArgs {
    #[arg(long)]
    pub good: i64,
    #[arg(long)]
    pub branch: i64,
    #[arg(long)]
    pub quantity: i64,
}

#[derive(Debug, Args)]
pub struct InventoryArgs {
    #[arg(long)]
    pub branch: Option<i64>,
    /// With --good, show a single stock level (warehouse when --branch is omitted)
    #[arg(long)]
    pub good: Option<i64>,
}

#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Units sold per branch and good
    Sales,
    /// Distribution history, newest first
    Distributions,
    /// Stock of every good at every branch
    Inventory,
    /// Warehouse, branch and sold totals
    Totals,
    /// Import history, newest first
    Imports,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create an account with the USER role
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Check credentials and print the actor to pass as --user/--role
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account with any role
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_parser = parse_role)]
        role: Role,
    },

    /// Change the acting user's password
    Passwd {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },

    /// Give a user the ADMIN role
    Promote {
        #[arg(long)]
        username: String,
    },

    Delete {
        #[arg(long = "id")]
        user_id: i64,
    },

    List,
}

fn parse_money(value: &str) -> Result<Money, String> {
    Money::parse(value).map_err(|e| e.to_string())
}

fn parse_role(value: &str) -> Result<Role, String> {
    value.parse::<Role>().map_err(|e| e.to_string())
}
