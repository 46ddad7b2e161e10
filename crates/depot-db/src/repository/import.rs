//! # Import Repository
//!
//! External procurement into the warehouse.
//!
//! ```text
//! record(ImportRecord { good_id, quantity: 20, unit_cost: 800.00,
//!                       sale_price: 1099.00, supplier: "Acme", .. })
//!      │
//!      ├── goods.quantity += 20
//!      ├── goods.price     = 1099.00
//!      └── INSERT imported_goods (good_name, 20, 800.00, date, "Acme", 16000.00)
//!                                  one transaction
//! ```

use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use depot_core::validation::{validate_import_date, validate_name, validate_price, validate_quantity};
use depot_core::{CoreError, ImportRecord, ImportedGood, Money, ValidationError};

#[derive(Debug, FromRow)]
struct ImportedGoodRow {
    id: i64,
    good_name: String,
    quantity: i64,
    price: f64,
    import_date: String,
    import_place: String,
    import_cost: f64,
}

impl From<ImportedGoodRow> for ImportedGood {
    fn from(row: ImportedGoodRow) -> Self {
        ImportedGood {
            id: row.id,
            good_name: row.good_name,
            quantity: row.quantity,
            price: Money::from_real(row.price),
            import_date: row.import_date,
            import_place: row.import_place,
            import_cost: Money::from_real(row.import_cost),
        }
    }
}

/// Repository for procurement history.
#[derive(Debug, Clone)]
pub struct ImportRepository {
    pool: SqlitePool,
}

impl ImportRepository {
    /// Creates a new ImportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ImportRepository { pool }
    }

    /// Applies an import to the warehouse and appends the history row.
    ///
    /// ## Rules
    /// - Quantity must be positive
    /// - Unit cost and sale price must not be negative
    /// - Date is `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`; supplier non-empty
    /// - The good must exist
    pub async fn record(&self, record: &ImportRecord) -> DbResult<ImportedGood> {
        validate_quantity(record.quantity)?;
        validate_price("unit_cost", record.unit_cost)?;
        validate_price("sale_price", record.sale_price)?;
        let import_date = validate_import_date(&record.import_date)?;
        let supplier = validate_name("supplier", &record.supplier)?;

        let import_cost = record
            .unit_cost
            .multiply_quantity(record.quantity)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "import_cost".to_string(),
            })?;

        debug!(
            good_id = record.good_id,
            quantity = record.quantity,
            import_cost = %import_cost,
            "Recording import"
        );

        let mut tx = self.pool.begin().await?;

        let good_name: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE goods SET quantity = quantity + ?2, price = ?3
            WHERE id = ?1
            RETURNING name
            "#,
        )
        .bind(record.good_id)
        .bind(record.quantity)
        .bind(record.sale_price.to_real())
        .fetch_optional(&mut *tx)
        .await?;

        let good_name = good_name.ok_or(CoreError::GoodNotFound(record.good_id))?;

        let row: ImportedGoodRow = sqlx::query_as(
            r#"
            INSERT INTO imported_goods
                (good_name, quantity, price, import_date, import_place, import_cost)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, good_name, quantity, price, import_date, import_place, import_cost
            "#,
        )
        .bind(&good_name)
        .bind(record.quantity)
        .bind(record.unit_cost.to_real())
        .bind(import_date)
        .bind(supplier)
        .bind(import_cost.to_real())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            good_id = record.good_id,
            good = %good_name,
            quantity = record.quantity,
            supplier,
            "Import recorded"
        );

        Ok(row.into())
    }

    /// Import history, newest first.
    pub async fn list(&self) -> DbResult<Vec<ImportedGood>> {
        let rows: Vec<ImportedGoodRow> = sqlx::query_as(
            r#"
            SELECT id, good_name, quantity, price, import_date, import_place, import_cost
            FROM imported_goods
            ORDER BY import_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ImportedGood::from).collect())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM imported_goods")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
