//! # Repository Module
//!
//! One repository per component. Each holds a clone of the pool and is
//! handed out by [`crate::Database`].
//!
//! ## Transaction Scope
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate input        (no store access; CoreError on failure)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  let mut tx = pool.begin()                                             │
//! │       │                                                                 │
//! │       ├── read   ─► check ─► Err(CoreError)  → tx dropped, rollback    │
//! │       ├── write  (&mut *tx)                                            │
//! │       ├── write  (&mut *tx)                                            │
//! │       ▼                                                                 │
//! │  tx.commit()                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Helpers that run inside another repository's transaction take
//! `&mut SqliteConnection` and never touch the pool; the in-memory test pool
//! has a single connection, and the open transaction already holds it.
//!
//! ## Available Repositories
//!
//! - [`goods::GoodsRepository`] - Warehouse stock, add-or-increment, rename
//! - [`branch::BranchRepository`] - Branch registry
//! - [`inventory::InventoryRepository`] - Per-branch stock
//! - [`distribution::DistributionRepository`] - Distribution engine
//! - [`sale::SaleRepository`] - Sales engine
//! - [`import::ImportRepository`] - Procurement into the warehouse
//! - [`user::UserRepository`] - Accounts and credentials
//! - [`stats::StatsRepository`] - Read-only reports

pub mod branch;
pub mod distribution;
pub mod goods;
pub mod import;
pub mod inventory;
pub mod sale;
pub mod stats;
pub mod user;

use chrono::Local;
use depot_core::TIMESTAMP_FORMAT;

/// Current local time as stored in every history row.
pub(crate) fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use depot_core::{ActorContext, Money, Role};

    use crate::{Database, DbConfig};

    pub async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn actor() -> ActorContext {
        ActorContext::new(1, Role::Staff)
    }

    /// A database with user #1, one good in the warehouse and two branches.
    ///
    /// Returns `(db, good_id, branch_a, branch_b)`.
    pub async fn stocked(quantity: i64) -> (Database, i64, i64, i64) {
        let db = db().await;
        db.users()
            .create_user("clerk", "pw", Role::Staff)
            .await
            .unwrap();
        let good = db
            .goods()
            .add_or_increment("Laptop", quantity, Money::from_cents(99999))
            .await
            .unwrap();
        let a = db.branches().add("Main", "City Center").await.unwrap();
        let b = db.branches().add("East", "East Side").await.unwrap();
        (db, good.id(), a.id, b.id)
    }
}
