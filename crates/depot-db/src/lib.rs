//! # depot-db: Database Layer for Depot
//!
//! This crate owns the SQLite store and every operation that reads or writes
//! it: the goods ledger, branch registry, branch inventory, the distribution
//! and sales engines, imports, users and the read-only reports.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Depot Data Flow                                │
//! │                                                                         │
//! │  depot-cli (distribute --good 1 --to 2 --quantity 10)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     depot-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐ │   │
//! │  │   │   Database    │    │   Repositories     │  │ Migrations │ │   │
//! │  │   │   (pool.rs)   │    │                    │  │ (embedded) │ │   │
//! │  │   │               │    │ GoodsRepository    │  │            │ │   │
//! │  │   │ SqlitePool    │◄───│ BranchRepository   │  │ 001_init   │ │   │
//! │  │   │ Transactions  │    │ InventoryRepository│  │            │ │   │
//! │  │   │               │    │ Distribution/Sale  │  │            │ │   │
//! │  │   │               │    │ Import/User/Stats  │  │            │ │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (depot.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per component
//! - [`seed`] - Sample branches and goods for a fresh store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use depot_core::{ActorContext, DistributionRequest, Money, Role};
//! use depot_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("depot.db")).await?;
//! let laptop = db.goods().add_or_increment("Laptop", 100, Money::from_cents(99999)).await?;
//! let main = db.branches().add("Main", "City Center").await?;
//!
//! let actor = ActorContext::new(1, Role::Staff);
//! db.distributions()
//!     .distribute(DistributionRequest::from_warehouse(laptop.id(), main.id, 10), &actor)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use seed::{seed_sample_data, SeedReport};

pub use repository::branch::BranchRepository;
pub use repository::distribution::DistributionRepository;
pub use repository::goods::GoodsRepository;
pub use repository::import::ImportRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::sale::SaleRepository;
pub use repository::stats::StatsRepository;
pub use repository::user::UserRepository;
