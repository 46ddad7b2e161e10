//! # Branch Repository
//!
//! Named branches with case-insensitively unique names.
//!
//! ## Delete Cascade
//! ```text
//! DELETE FROM branches WHERE id = B
//!      │
//!      ├── branch_inventories (branch_id = B)      → deleted
//!      ├── sales              (branch_id = B)      → deleted
//!      ├── distributions      (to_branch_id = B)   → deleted
//!      └── distributions      (from_branch_id = B) → from_branch_id = NULL
//! ```
//! A distribution sourced from a deleted branch then reads as if it came from
//! the warehouse in the history report.

use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::error::DbResult;
use depot_core::validation::validate_name;
use depot_core::{Branch, CoreError};

#[derive(Debug, FromRow)]
struct BranchRow {
    id: i64,
    name: String,
    location: String,
}

impl From<BranchRow> for Branch {
    fn from(row: BranchRow) -> Self {
        Branch {
            id: row.id,
            name: row.name,
            location: row.location,
        }
    }
}

/// Repository for branch reference data.
#[derive(Debug, Clone)]
pub struct BranchRepository {
    pool: SqlitePool,
}

impl BranchRepository {
    /// Creates a new BranchRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BranchRepository { pool }
    }

    /// All branches, by id.
    pub async fn list(&self) -> DbResult<Vec<Branch>> {
        let rows: Vec<BranchRow> =
            sqlx::query_as("SELECT id, name, location FROM branches ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Branch::from).collect())
    }

    pub async fn get_by_id(&self, branch_id: i64) -> DbResult<Option<Branch>> {
        let row: Option<BranchRow> =
            sqlx::query_as("SELECT id, name, location FROM branches WHERE id = ?1")
                .bind(branch_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Branch::from))
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM branches")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Adds a branch. Fails with `DuplicateName` on a case-insensitive clash.
    pub async fn add(&self, name: &str, location: &str) -> DbResult<Branch> {
        let name = validate_name("name", name)?;
        let location = validate_name("location", location)?;

        let mut tx = self.pool.begin().await?;

        if Self::name_taken(&mut *tx, name, None).await? {
            warn!(name, "Branch name already exists");
            return Err(CoreError::duplicate("Branch", name).into());
        }

        let row: BranchRow = sqlx::query_as(
            "INSERT INTO branches (name, location) VALUES (?1, ?2) RETURNING id, name, location",
        )
        .bind(name)
        .bind(location)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(branch_id = row.id, name, "Branch added");
        Ok(row.into())
    }

    /// Renames and relocates a branch.
    ///
    /// Keeping its own name (in any case) is not a clash.
    pub async fn edit(&self, branch_id: i64, name: &str, location: &str) -> DbResult<Branch> {
        let name = validate_name("name", name)?;
        let location = validate_name("location", location)?;

        let mut tx = self.pool.begin().await?;

        if Self::name_taken(&mut *tx, name, Some(branch_id)).await? {
            warn!(branch_id, name, "Branch name already exists");
            return Err(CoreError::duplicate("Branch", name).into());
        }

        let row: Option<BranchRow> = sqlx::query_as(
            r#"
            UPDATE branches SET name = ?2, location = ?3
            WHERE id = ?1
            RETURNING id, name, location
            "#,
        )
        .bind(branch_id)
        .bind(name)
        .bind(location)
        .fetch_optional(&mut *tx)
        .await?;

        let branch = row.map(Branch::from).ok_or(CoreError::BranchNotFound(branch_id))?;
        tx.commit().await?;

        info!(branch_id, name, "Branch updated");
        Ok(branch)
    }

    /// Deletes a branch and, through the foreign keys, everything hanging off it.
    pub async fn delete(&self, branch_id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM branches WHERE id = ?1")
            .bind(branch_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::BranchNotFound(branch_id).into());
        }

        info!(branch_id, "Branch deleted");
        Ok(())
    }

    /// Whether `branch_id` exists, inside an open transaction.
    pub(crate) async fn exists(conn: &mut SqliteConnection, branch_id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM branches WHERE id = ?1")
            .bind(branch_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(found.is_some())
    }

    async fn name_taken(
        conn: &mut SqliteConnection,
        name: &str,
        except: Option<i64>,
    ) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM branches WHERE LOWER(name) = LOWER(?1) AND id IS NOT ?2",
        )
        .bind(name)
        .bind(except)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(found.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
