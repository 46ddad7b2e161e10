//! # Statistics Repository
//!
//! Read-only joins over the ledger. No invariants of its own.
//!
//! | Report                 | Order                         |
//! |------------------------|-------------------------------|
//! | `sales_by_branch`      | branch name, good name        |
//! | `distribution_history` | date descending               |
//! | `inventory_snapshot`   | branch name, good name        |

use sqlx::{FromRow, SqlitePool};

use crate::error::DbResult;
use depot_core::{
    DistributionHistoryRow, InventorySnapshotRow, SalesByBranchRow, StockTotals, WAREHOUSE_LABEL,
};

#[derive(Debug, FromRow)]
struct SalesByBranch {
    branch_name: String,
    good_name: String,
    total_sold: i64,
}

#[derive(Debug, FromRow)]
struct HistoryLine {
    good_name: String,
    from_branch: String,
    to_branch: String,
    quantity: i64,
    distribution_date: String,
    distributed_by: Option<String>,
}

#[derive(Debug, FromRow)]
struct SnapshotLine {
    branch_name: String,
    good_name: String,
    quantity: i64,
}

/// Repository for reports.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    /// Creates a new StatsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StatsRepository { pool }
    }

    /// Units sold per (branch, good).
    pub async fn sales_by_branch(&self) -> DbResult<Vec<SalesByBranchRow>> {
        let rows: Vec<SalesByBranch> = sqlx::query_as(
            r#"
            SELECT b.name AS branch_name,
                   g.name AS good_name,
                   SUM(s.quantity) AS total_sold
            FROM sales s
            JOIN goods g ON s.good_id = g.id
            JOIN branches b ON s.branch_id = b.id
            GROUP BY s.branch_id, s.good_id
            ORDER BY b.name, g.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SalesByBranchRow {
                branch_name: r.branch_name,
                good_name: r.good_name,
                total_sold: r.total_sold,
            })
            .collect())
    }

    /// Full distribution history, newest first.
    ///
    /// A `NULL` source reads as "Warehouse". A deleted distributor keeps the
    /// row with `distributed_by = None`.
    pub async fn distribution_history(&self) -> DbResult<Vec<DistributionHistoryRow>> {
        let rows: Vec<HistoryLine> = sqlx::query_as(
            r#"
            SELECT g.name AS good_name,
                   COALESCE(sb.name, ?1) AS from_branch,
                   tb.name AS to_branch,
                   d.quantity,
                   d.distribution_date,
                   u.username AS distributed_by
            FROM distributions d
            LEFT JOIN branches sb ON d.from_branch_id = sb.id
            JOIN branches tb ON d.to_branch_id = tb.id
            JOIN goods g ON d.good_id = g.id
            LEFT JOIN users u ON d.distributed_by_user_id = u.id
            ORDER BY d.distribution_date DESC, d.id DESC
            "#,
        )
        .bind(WAREHOUSE_LABEL)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DistributionHistoryRow {
                good_name: r.good_name,
                from_branch: r.from_branch,
                to_branch: r.to_branch,
                quantity: r.quantity,
                distribution_date: r.distribution_date,
                distributed_by: r.distributed_by,
            })
            .collect())
    }

    /// Current stock of every good at every branch it was distributed to.
    pub async fn inventory_snapshot(&self) -> DbResult<Vec<InventorySnapshotRow>> {
        let rows: Vec<SnapshotLine> = sqlx::query_as(
            r#"
            SELECT b.name AS branch_name, g.name AS good_name, bi.quantity
            FROM branch_inventories bi
            JOIN branches b ON bi.branch_id = b.id
            JOIN goods g ON bi.good_id = g.id
            ORDER BY b.name, g.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| InventorySnapshotRow {
                branch_name: r.branch_name,
                good_name: r.good_name,
                quantity: r.quantity,
            })
            .collect())
    }

    /// Units held in the warehouse across all goods.
    pub async fn warehouse_total(&self) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM goods")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Warehouse, branch and sold totals read in one statement.
    pub async fn conservation_total(&self) -> DbResult<StockTotals> {
        let (warehouse, branches, sold): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COALESCE(SUM(quantity), 0) FROM goods),
                (SELECT COALESCE(SUM(quantity), 0) FROM branch_inventories),
                (SELECT COALESCE(SUM(quantity), 0) FROM sales)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StockTotals {
            warehouse,
            branches,
            sold,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
