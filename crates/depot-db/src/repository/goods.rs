//! # Goods Repository
//!
//! The warehouse ledger: `goods.quantity` is stock not yet distributed to any
//! branch.
//!
//! ## Add-or-Increment
//! ```text
//! add_or_increment("widget", 3, 99.00)
//!      │
//!      ▼
//! SELECT id FROM goods WHERE LOWER(name) = LOWER('widget')
//!      │
//!      ├── hit  → quantity += 3           (price untouched)
//!      │           GoodUpsert::Incremented { id, quantity: 8 }
//!      │
//!      └── miss → INSERT ('widget', 3, 99.00)
//!                  GoodUpsert::Inserted { id }
//! ```
//!
//! The stored name keeps the casing of the first add; uniqueness is enforced
//! case-insensitively here, on top of the case-sensitive UNIQUE column.

use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::import::ImportRepository;
use crate::repository::inventory::InventoryRepository;
use depot_core::validation::{validate_name, validate_price, validate_stock_delta};
use depot_core::{
    CoreError, Good, GoodUpsert, ImportRecord, ImportedGood, Money, StockLevel, StockLocation,
};

#[derive(Debug, FromRow)]
pub(crate) struct GoodRow {
    id: i64,
    name: String,
    quantity: i64,
    price: f64,
}

impl From<GoodRow> for Good {
    fn from(row: GoodRow) -> Self {
        Good {
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            price: Money::from_real(row.price),
        }
    }
}

/// Repository for warehouse goods.
#[derive(Debug, Clone)]
pub struct GoodsRepository {
    pool: SqlitePool,
}

impl GoodsRepository {
    /// Creates a new GoodsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        GoodsRepository { pool }
    }

    /// Adds stock by name, creating the good on first add.
    ///
    /// ## Rules
    /// - Name must be non-empty after trimming
    /// - Quantity may be zero, never negative
    /// - Price must not be negative; it is only used when inserting
    ///
    /// Invalid input is rejected before the store is touched.
    pub async fn add_or_increment(
        &self,
        name: &str,
        quantity: i64,
        price: Money,
    ) -> DbResult<GoodUpsert> {
        let name = validate_name("name", name)?;
        validate_stock_delta(quantity)?;
        validate_price("price", price)?;

        debug!(name, quantity, price = %price, "Adding goods");

        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM goods WHERE LOWER(name) = LOWER(?1)")
                .bind(name)
                .fetch_optional(&mut *tx)
                .await?;

        let upsert = match existing {
            Some(id) => {
                let quantity: i64 = sqlx::query_scalar(
                    "UPDATE goods SET quantity = quantity + ?2 WHERE id = ?1 RETURNING quantity",
                )
                .bind(id)
                .bind(quantity)
                .fetch_one(&mut *tx)
                .await?;
                GoodUpsert::Incremented { id, quantity }
            }
            None => {
                let id: i64 = sqlx::query_scalar(
                    "INSERT INTO goods (name, quantity, price) VALUES (?1, ?2, ?3) RETURNING id",
                )
                .bind(name)
                .bind(quantity)
                .bind(price.to_real())
                .fetch_one(&mut *tx)
                .await?;
                GoodUpsert::Inserted { id }
            }
        };

        tx.commit().await?;

        match upsert {
            GoodUpsert::Incremented { id, quantity } => {
                info!(good_id = id, name, quantity, "Warehouse stock increased")
            }
            GoodUpsert::Inserted { id } => info!(good_id = id, name, "Good added"),
        }

        Ok(upsert)
    }

    /// Unit price of a good, `None` if it does not exist.
    pub async fn unit_price(&self, good_id: i64) -> DbResult<Option<Money>> {
        let price: Option<f64> = sqlx::query_scalar("SELECT price FROM goods WHERE id = ?1")
            .bind(good_id)
            .fetch_optional(&self.pool)
            .await?;

        if price.is_none() {
            warn!(good_id, "Unit price requested for unknown good");
        }

        Ok(price.map(Money::from_real))
    }

    /// All goods, by id.
    pub async fn list_all(&self) -> DbResult<Vec<Good>> {
        let rows: Vec<GoodRow> =
            sqlx::query_as("SELECT id, name, quantity, price FROM goods ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Good::from).collect())
    }

    /// Case-insensitive lookup by name.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Good>> {
        let row: Option<GoodRow> = sqlx::query_as(
            "SELECT id, name, quantity, price FROM goods WHERE LOWER(name) = LOWER(?1)",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Good::from))
    }

    pub async fn get_by_id(&self, good_id: i64) -> DbResult<Option<Good>> {
        let row: Option<GoodRow> =
            sqlx::query_as("SELECT id, name, quantity, price FROM goods WHERE id = ?1")
                .bind(good_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Good::from))
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM goods")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Records a procurement: quantity in, new selling price, history row.
    ///
    /// All three effects commit together. See [`ImportRepository::record`].
    pub async fn record_import(&self, record: &ImportRecord) -> DbResult<ImportedGood> {
        ImportRepository::new(self.pool.clone()).record(record).await
    }

    /// Renames a good and sets its price.
    ///
    /// The new name must not collide (case-insensitively) with another good.
    pub async fn update(&self, good_id: i64, name: &str, price: Money) -> DbResult<Good> {
        let name = validate_name("name", name)?;
        validate_price("price", price)?;

        let mut tx = self.pool.begin().await?;

        let clash: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM goods WHERE LOWER(name) = LOWER(?1) AND id <> ?2",
        )
        .bind(name)
        .bind(good_id)
        .fetch_optional(&mut *tx)
        .await?;

        if clash.is_some() {
            warn!(good_id, name, "Rename rejected: name taken");
            return Err(CoreError::duplicate("Good", name).into());
        }

        let row: Option<GoodRow> = sqlx::query_as(
            r#"
            UPDATE goods SET name = ?2, price = ?3
            WHERE id = ?1
            RETURNING id, name, quantity, price
            "#,
        )
        .bind(good_id)
        .bind(name)
        .bind(price.to_real())
        .fetch_optional(&mut *tx)
        .await?;

        let good = row.map(Good::from).ok_or(CoreError::GoodNotFound(good_id))?;
        tx.commit().await?;

        info!(good_id, name, price = %price, "Good updated");
        Ok(good)
    }

    /// Deletes a good.
    ///
    /// Its sales, distributions and branch inventory rows go with it
    /// (`ON DELETE CASCADE`).
    pub async fn delete(&self, good_id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM goods WHERE id = ?1")
            .bind(good_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::GoodNotFound(good_id).into());
        }

        info!(good_id, "Good deleted");
        Ok(())
    }

    /// Current stock in the warehouse (`branch_id = None`) or at a branch.
    pub async fn stock_level(&self, good_id: i64, branch_id: Option<i64>) -> DbResult<StockLevel> {
        let location = StockLocation::from_branch(branch_id);
        let mut conn = self.pool.acquire().await?;

        let quantity = match location {
            StockLocation::Warehouse => Self::read_warehouse(&mut *conn, good_id).await?,
            StockLocation::Branch(branch_id) => {
                InventoryRepository::read_quantity(&mut *conn, branch_id, good_id).await?
            }
        };

        let quantity = quantity.ok_or_else(|| {
            DbError::not_found("Stock record", format!("good {} in {}", good_id, location))
        })?;

        Ok(StockLevel {
            good_id,
            location,
            quantity,
        })
    }

    // =========================================================================
    // Transaction-scoped helpers
    // =========================================================================

    /// Warehouse quantity; `None` when the good does not exist.
    pub(crate) async fn read_warehouse(
        conn: &mut SqliteConnection,
        good_id: i64,
    ) -> DbResult<Option<i64>> {
        let quantity: Option<i64> = sqlx::query_scalar("SELECT quantity FROM goods WHERE id = ?1")
            .bind(good_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(quantity)
    }

    /// Guarded warehouse decrement, returning what is left.
    pub(crate) async fn decrement_warehouse(
        conn: &mut SqliteConnection,
        good_id: i64,
        quantity: i64,
    ) -> DbResult<i64> {
        debug!(good_id, quantity, "Decrementing warehouse stock");

        let remaining: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE goods SET quantity = quantity - ?2
            WHERE id = ?1 AND quantity >= ?2
            RETURNING quantity
            "#,
        )
        .bind(good_id)
        .bind(quantity)
        .fetch_optional(&mut *conn)
        .await?;

        remaining.ok_or_else(|| {
            DbError::TransactionFailed(format!(
                "warehouse stock of good {} changed during the operation",
                good_id
            ))
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
