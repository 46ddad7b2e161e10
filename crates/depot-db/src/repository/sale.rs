//! # Sales Engine
//!
//! Records sales against branch stock.
//!
//! ## Sale Flow
//! ```text
//! record_sale(good, branch, qty, actor)
//!      │
//!      ├── qty <= 0 ─────────────────────────► InvalidQuantity
//!      ▼
//! BEGIN
//!      ├── no branch_inventories row ────────► NoInventoryRecord
//!      ├── row.quantity < qty ───────────────► InsufficientStock{available}
//!      ▼
//! decrement branch stock (guarded) + INSERT sales
//! COMMIT
//! ```
//!
//! A sale never touches `goods.quantity`: the stock it consumes was already
//! moved out of the warehouse by a distribution.

use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::DbResult;
use crate::repository::inventory::InventoryRepository;
use crate::repository::now_timestamp;
use depot_core::validation::validate_quantity;
use depot_core::{ActorContext, CoreError, Sale, SaleReceipt, SaleRequest, StockLocation};

#[derive(Debug, FromRow)]
struct SaleRow {
    id: i64,
    good_id: i64,
    quantity: i64,
    sale_date: String,
    sold_by_user_id: Option<i64>,
    branch_id: Option<i64>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            good_id: row.good_id,
            quantity: row.quantity,
            sale_date: row.sale_date,
            sold_by_user_id: row.sold_by_user_id,
            branch_id: row.branch_id,
        }
    }
}

/// Repository for the sales engine and its history.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Sells from a branch's stock.
    pub async fn record_sale(
        &self,
        request: SaleRequest,
        actor: &ActorContext,
    ) -> DbResult<SaleReceipt> {
        validate_quantity(request.quantity)?;

        debug!(
            good_id = request.good_id,
            branch_id = request.branch_id,
            quantity = request.quantity,
            user_id = actor.user_id,
            "Recording sale"
        );

        let mut tx = self.pool.begin().await?;

        let available =
            InventoryRepository::read_quantity(&mut *tx, request.branch_id, request.good_id)
                .await?
                .ok_or_else(|| {
                    warn!(
                        branch_id = request.branch_id,
                        good_id = request.good_id,
                        "No inventory row for sale"
                    );
                    CoreError::NoInventoryRecord {
                        branch_id: request.branch_id,
                        good_id: request.good_id,
                    }
                })?;

        if available < request.quantity {
            warn!(
                branch_id = request.branch_id,
                needed = request.quantity,
                available,
                "Insufficient stock for sale"
            );
            return Err(CoreError::InsufficientStock {
                location: StockLocation::Branch(request.branch_id),
                available,
                requested: request.quantity,
            }
            .into());
        }

        let remaining = InventoryRepository::decrement(
            &mut *tx,
            request.branch_id,
            request.good_id,
            request.quantity,
        )
        .await?;

        let sale_date = now_timestamp();
        let sale_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sales (good_id, quantity, sale_date, sold_by_user_id, branch_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(request.good_id)
        .bind(request.quantity)
        .bind(&sale_date)
        .bind(actor.user_id)
        .bind(request.branch_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            sale_id,
            good_id = request.good_id,
            branch_id = request.branch_id,
            quantity = request.quantity,
            remaining,
            "Sale recorded"
        );

        Ok(SaleReceipt {
            sale_id,
            remaining,
            sale_date,
        })
    }

    /// All sales, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let rows: Vec<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, good_id, quantity, sale_date, sold_by_user_id, branch_id
            FROM sales
            ORDER BY sale_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Sale::from).collect())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
