//! # Distribution Engine
//!
//! Moves quantity from the warehouse or a source branch into a destination
//! branch.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  distribute(good, from?, to, qty, actor)                               │
//! │                                                                         │
//! │  qty <= 0 ? ─────────────────────────────► InvalidQuantity             │
//! │  from == to ? ───────────────────────────► Validation                  │
//! │       │                                   (no store access)            │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │  good exists? ───────────────────────────► GoodNotFound                │
//! │  destination exists? ────────────────────► BranchNotFound              │
//! │  source branch exists? ──────────────────► BranchNotFound              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  source stock = from ? branch_inventories : goods.quantity             │
//! │  branch row missing ? ───────────────────► NoSourceInventory           │
//! │  stock < qty ? ──────────────────────────► InsufficientStock{available}│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌────────────────── atomic ───────────────────┐                       │
//! │  │ 1. decrement source (guarded)               │                       │
//! │  │ 2. upsert destination                       │                       │
//! │  │ 3. INSERT distributions (timestamp, actor)  │                       │
//! │  └─────────────────────────────────────────────┘                       │
//! │  COMMIT                                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  log expected margin = qty × unit price × 20%  (not persisted)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every early return drops the open transaction, which rolls it back, so a
//! failure never leaves the source decremented without the destination
//! credited and the history row written.

use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::DbResult;
use crate::repository::branch::BranchRepository;
use crate::repository::goods::GoodsRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::now_timestamp;
use depot_core::validation::validate_quantity;
use depot_core::{
    ActorContext, CoreError, Distribution, DistributionReceipt, DistributionRequest, Money, Rate,
    StockLocation, ValidationError, EXPECTED_MARGIN_BPS,
};

#[derive(Debug, FromRow)]
struct DistributionRow {
    id: i64,
    good_id: i64,
    from_branch_id: Option<i64>,
    to_branch_id: i64,
    quantity: i64,
    distribution_date: String,
    distributed_by_user_id: Option<i64>,
}

impl From<DistributionRow> for Distribution {
    fn from(row: DistributionRow) -> Self {
        Distribution {
            id: row.id,
            good_id: row.good_id,
            from_branch_id: row.from_branch_id,
            to_branch_id: row.to_branch_id,
            quantity: row.quantity,
            distribution_date: row.distribution_date,
            distributed_by_user_id: row.distributed_by_user_id,
        }
    }
}

/// Repository for the distribution engine and its history.
#[derive(Debug, Clone)]
pub struct DistributionRepository {
    pool: SqlitePool,
}

impl DistributionRepository {
    /// Creates a new DistributionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DistributionRepository { pool }
    }

    /// Distributes goods to a branch.
    ///
    /// ## Returns
    /// * `Ok(DistributionReceipt)` - all three effects committed
    /// * `Err(DbError::Core(..))` - a precondition failed; nothing written
    /// * `Err(other)` - storage failure; the transaction was rolled back
    pub async fn distribute(
        &self,
        request: DistributionRequest,
        actor: &ActorContext,
    ) -> DbResult<DistributionReceipt> {
        validate_quantity(request.quantity)?;
        if request.from_branch_id == Some(request.to_branch_id) {
            return Err(ValidationError::InvalidFormat {
                field: "from_branch_id".to_string(),
                reason: "source and destination branch must differ".to_string(),
            }
            .into());
        }

        let source = request.source();
        debug!(
            good_id = request.good_id,
            from = %source,
            to_branch_id = request.to_branch_id,
            quantity = request.quantity,
            user_id = actor.user_id,
            "Distributing goods"
        );

        let mut tx = self.pool.begin().await?;

        // Preconditions
        let (warehouse_quantity, price): (i64, f64) =
            sqlx::query_as("SELECT quantity, price FROM goods WHERE id = ?1")
                .bind(request.good_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(CoreError::GoodNotFound(request.good_id))?;

        if !BranchRepository::exists(&mut *tx, request.to_branch_id).await? {
            return Err(CoreError::BranchNotFound(request.to_branch_id).into());
        }

        let available = match source {
            StockLocation::Warehouse => warehouse_quantity,
            StockLocation::Branch(from) => {
                if !BranchRepository::exists(&mut *tx, from).await? {
                    return Err(CoreError::BranchNotFound(from).into());
                }
                InventoryRepository::read_quantity(&mut *tx, from, request.good_id)
                    .await?
                    .ok_or_else(|| {
                        warn!(branch_id = from, good_id = request.good_id, "No source inventory");
                        CoreError::NoSourceInventory {
                            branch_id: from,
                            good_id: request.good_id,
                        }
                    })?
            }
        };

        if available < request.quantity {
            warn!(
                from = %source,
                good_id = request.good_id,
                needed = request.quantity,
                available,
                "Insufficient stock for distribution"
            );
            return Err(CoreError::InsufficientStock {
                location: source,
                available,
                requested: request.quantity,
            }
            .into());
        }

        // Atomic unit
        let source_remaining = match source {
            StockLocation::Warehouse => {
                GoodsRepository::decrement_warehouse(&mut *tx, request.good_id, request.quantity)
                    .await?
            }
            StockLocation::Branch(from) => {
                InventoryRepository::decrement(&mut *tx, from, request.good_id, request.quantity)
                    .await?
            }
        };

        let destination_quantity = InventoryRepository::upsert(
            &mut *tx,
            request.to_branch_id,
            request.good_id,
            request.quantity,
        )
        .await?;

        let distribution_date = now_timestamp();
        let distribution_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO distributions (
                good_id, from_branch_id, to_branch_id,
                quantity, distribution_date, distributed_by_user_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            "#,
        )
        .bind(request.good_id)
        .bind(request.from_branch_id)
        .bind(request.to_branch_id)
        .bind(request.quantity)
        .bind(&distribution_date)
        .bind(actor.user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let expected_margin = Money::from_real(price)
            .percentage_of_quantity(request.quantity, Rate::from_bps(EXPECTED_MARGIN_BPS));

        info!(
            distribution_id,
            good_id = request.good_id,
            from = %source,
            to_branch_id = request.to_branch_id,
            quantity = request.quantity,
            expected_margin = %expected_margin,
            "Goods distributed"
        );

        Ok(DistributionReceipt {
            distribution_id,
            source,
            source_remaining,
            destination_quantity,
            distribution_date,
            expected_margin,
        })
    }

    /// Raw distribution history, newest first.
    pub async fn history(&self) -> DbResult<Vec<Distribution>> {
        let rows: Vec<DistributionRow> = sqlx::query_as(
            r#"
            SELECT id, good_id, from_branch_id, to_branch_id,
                   quantity, distribution_date, distributed_by_user_id
            FROM distributions
            ORDER BY distribution_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Distribution::from).collect())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM distributions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{actor, stocked};
    use crate::DbError;

    #[tokio::test]
    async fn test_distribute_from_warehouse() {
        let (db, good, a, _) = stocked(100).await;

        let receipt = db
            .distributions()
            .distribute(DistributionRequest::from_warehouse(good, a, 10), &actor())
            .await
            .unwrap();

        assert_eq!(receipt.source, StockLocation::Warehouse);
        assert_eq!(receipt.source_remaining, 90);
        assert_eq!(receipt.destination_quantity, 10);
        // 10 × 999.99 × 20%
        assert_eq!(receipt.expected_margin, Money::from_cents(199998));

        assert_eq!(db.goods().get_by_id(good).await.unwrap().unwrap().quantity, 90);
        assert_eq!(db.inventory().get(a, good).await.unwrap().unwrap().quantity, 10);

        let history = db.distributions().history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, receipt.distribution_id);
        assert_eq!(history[0].from_branch_id, None);
        assert_eq!(history[0].to_branch_id, a);
        assert_eq!(history[0].quantity, 10);
        assert_eq!(history[0].distributed_by_user_id, Some(1));
        assert_eq!(history[0].distribution_date.len(), 19);
    }

    #[tokio::test]
    async fn test_distribute_between_branches() {
        let (db, good, a, b) = stocked(100).await;
        let distributions = db.distributions();

        distributions
            .distribute(DistributionRequest::from_warehouse(good, a, 30), &actor())
            .await
            .unwrap();
        let receipt = distributions
            .distribute(DistributionRequest::between_branches(good, a, b, 12), &actor())
            .await
            .unwrap();

        assert_eq!(receipt.source, StockLocation::Branch(a));
        assert_eq!(receipt.source_remaining, 18);
        assert_eq!(receipt.destination_quantity, 12);
        assert_eq!(db.goods().get_by_id(good).await.unwrap().unwrap().quantity, 70);
        assert_eq!(distributions.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_repeat_distribution_increments_destination() {
        let (db, good, a, _) = stocked(100).await;

        for _ in 0..3 {
            db.distributions()
                .distribute(DistributionRequest::from_warehouse(good, a, 5), &actor())
                .await
                .unwrap();
        }

        assert_eq!(db.inventory().get(a, good).await.unwrap().unwrap().quantity, 15);
        assert_eq!(db.inventory().list_for_branch(a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insufficient_stock_changes_nothing() {
        let (db, good, a, _) = stocked(30).await;

        let err = db
            .distributions()
            .distribute(DistributionRequest::from_warehouse(good, a, 50), &actor())
            .await
            .unwrap_err();

        assert_eq!(
            err.as_core(),
            Some(&CoreError::InsufficientStock {
                location: StockLocation::Warehouse,
                available: 30,
                requested: 50,
            })
        );
        assert_eq!(db.goods().get_by_id(good).await.unwrap().unwrap().quantity, 30);
        assert!(db.inventory().get(a, good).await.unwrap().is_none());
        assert_eq!(db.distributions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_source_row_is_not_zero() {
        let (db, good, a, b) = stocked(30).await;

        let err = db
            .distributions()
            .distribute(DistributionRequest::between_branches(good, a, b, 1), &actor())
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_core(),
            Some(CoreError::NoSourceInventory { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_positive_quantity() {
        let (db, good, a, _) = stocked(30).await;

        for quantity in [0, -4] {
            let err = db
                .distributions()
                .distribute(DistributionRequest::from_warehouse(good, a, quantity), &actor())
                .await
                .unwrap_err();
            assert!(matches!(err.as_core(), Some(CoreError::InvalidQuantity)));
        }
        assert_eq!(db.distributions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_good_and_branches() {
        let (db, good, a, _) = stocked(30).await;
        let distributions = db.distributions();

        let err = distributions
            .distribute(DistributionRequest::from_warehouse(good + 100, a, 1), &actor())
            .await
            .unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::GoodNotFound(_))));

        let err = distributions
            .distribute(DistributionRequest::from_warehouse(good, 999, 1), &actor())
            .await
            .unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::BranchNotFound(999))));

        let err = distributions
            .distribute(DistributionRequest::between_branches(good, 998, a, 1), &actor())
            .await
            .unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::BranchNotFound(998))));
    }

    #[tokio::test]
    async fn test_same_source_and_destination_rejected() {
        let (db, good, a, _) = stocked(30).await;

        let err = db
            .distributions()
            .distribute(DistributionRequest::between_branches(good, a, a, 1), &actor())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_huge_distribution_returns_saturated_margin() {
        let (db, good, a, _) = stocked(100_000_000_000_000_000).await;

        let receipt = db
            .distributions()
            .distribute(
                DistributionRequest::from_warehouse(good, a, 100_000_000_000_000_000),
                &actor(),
            )
            .await
            .unwrap();

        assert_eq!(receipt.source_remaining, 0);
        assert_eq!(receipt.destination_quantity, 100_000_000_000_000_000);
        assert_eq!(receipt.expected_margin, Money::from_cents(i64::MAX));
        assert_eq!(db.distributions().count().await.unwrap(), 1);
    }
}
