//! # Branch Inventory Repository
//!
//! Per-(branch, good) sellable stock.
//!
//! Rows are only ever created by a distribution (the upsert below). The
//! transaction-scoped helpers are what the distribution and sales engines
//! compose inside their own transactions.
//!
//! ## Guarded Decrement
//! ```text
//! UPDATE branch_inventories
//!    SET quantity = quantity - :n
//!  WHERE branch_id = :b AND good_id = :g AND quantity >= :n
//!
//! 1 row  → committed path
//! 0 rows → stock changed since it was read; TransactionFailed, rollback
//! ```
//! The guard keeps `quantity >= 0` even if another writer slipped in between
//! the read and the update.

use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use depot_core::BranchInventory;

#[derive(Debug, FromRow)]
struct InventoryRow {
    branch_id: i64,
    good_id: i64,
    quantity: i64,
}

impl From<InventoryRow> for BranchInventory {
    fn from(row: InventoryRow) -> Self {
        BranchInventory {
            branch_id: row.branch_id,
            good_id: row.good_id,
            quantity: row.quantity,
        }
    }
}

/// Repository for branch inventory reads.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// The stock row for one good at one branch, if it was ever distributed there.
    pub async fn get(&self, branch_id: i64, good_id: i64) -> DbResult<Option<BranchInventory>> {
        let row: Option<InventoryRow> = sqlx::query_as(
            r#"
            SELECT branch_id, good_id, quantity
            FROM branch_inventories
            WHERE branch_id = ?1 AND good_id = ?2
            "#,
        )
        .bind(branch_id)
        .bind(good_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BranchInventory::from))
    }

    /// All stock rows of a branch, by good id.
    pub async fn list_for_branch(&self, branch_id: i64) -> DbResult<Vec<BranchInventory>> {
        let rows: Vec<InventoryRow> = sqlx::query_as(
            r#"
            SELECT branch_id, good_id, quantity
            FROM branch_inventories
            WHERE branch_id = ?1
            ORDER BY good_id
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BranchInventory::from).collect())
    }

    /// Units of a good held across all branches.
    pub async fn total_for_good(&self, good_id: i64) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM branch_inventories WHERE good_id = ?1",
        )
        .bind(good_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    // =========================================================================
    // Transaction-scoped helpers
    // =========================================================================

    /// Reads the quantity; `None` when the row does not exist.
    pub(crate) async fn read_quantity(
        conn: &mut SqliteConnection,
        branch_id: i64,
        good_id: i64,
    ) -> DbResult<Option<i64>> {
        let quantity: Option<i64> = sqlx::query_scalar(
            "SELECT quantity FROM branch_inventories WHERE branch_id = ?1 AND good_id = ?2",
        )
        .bind(branch_id)
        .bind(good_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(quantity)
    }

    /// Removes `quantity` from the row, returning what is left.
    pub(crate) async fn decrement(
        conn: &mut SqliteConnection,
        branch_id: i64,
        good_id: i64,
        quantity: i64,
    ) -> DbResult<i64> {
        debug!(branch_id, good_id, quantity, "Decrementing branch stock");

        let remaining: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE branch_inventories
            SET quantity = quantity - ?3
            WHERE branch_id = ?1 AND good_id = ?2 AND quantity >= ?3
            RETURNING quantity
            "#,
        )
        .bind(branch_id)
        .bind(good_id)
        .bind(quantity)
        .fetch_optional(&mut *conn)
        .await?;

        remaining.ok_or_else(|| {
            DbError::TransactionFailed(format!(
                "stock of good {} at branch {} changed during the operation",
                good_id, branch_id
            ))
        })
    }

    /// Adds `quantity` to the row, creating it if absent. Returns the new quantity.
    pub(crate) async fn upsert(
        conn: &mut SqliteConnection,
        branch_id: i64,
        good_id: i64,
        quantity: i64,
    ) -> DbResult<i64> {
        debug!(branch_id, good_id, quantity, "Crediting branch stock");

        let total: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO branch_inventories (branch_id, good_id, quantity)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(branch_id, good_id)
            DO UPDATE SET quantity = quantity + excluded.quantity
            RETURNING quantity
            "#,
        )
        .bind(branch_id)
        .bind(good_id)
        .bind(quantity)
        .fetch_one(&mut *conn)
        .await?;

        Ok(total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
