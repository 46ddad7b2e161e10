//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          CoreError (business rule)         │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError (this module) ◄──────── DbError::Core                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Outcome { success: false, reason, available }                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UI displays `reason` verbatim                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `Core` error is always raised before the transaction writes anything.
//! Any other variant comes from SQLite; the open transaction is dropped and
//! rolled back, so the store is left untouched either way.

use depot_core::{CoreError, Outcome, OutcomeCode, ValidationError};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// A business rule rejected the operation.
    ///
    /// ## When This Occurs
    /// - Non-positive quantity, empty name, negative price
    /// - Good, branch or inventory row missing
    /// - Insufficient stock
    /// - Case-insensitive name collision
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - Stock lookup for a location with no record
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - A racing writer inserted the same name between our check and insert
    /// - Any UNIQUE index violation
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a deleted good or branch
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    ///
    /// ## When This Occurs
    /// - A guarded decrement matched no row (stock changed under us)
    /// - Commit failed
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// The business error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            DbError::Core(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Core(CoreError::Validation(err))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Converts database errors to the outcome the UI renders.
///
/// Business errors keep their reason and `available` figure. Storage errors
/// are logged with full context and surfaced as a generic failure carrying
/// the cause string.
impl From<DbError> for Outcome {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(core) => Outcome::from(&core),
            DbError::NotFound { .. } => Outcome::failure(OutcomeCode::NotFound, err.to_string()),
            DbError::UniqueViolation { ref field, .. } => Outcome::failure(
                OutcomeCode::DuplicateName,
                format!("A record with this {} already exists.", field),
            ),
            other => {
                tracing::error!(error = %other, "Storage failure");
                Outcome::failure(OutcomeCode::StorageFailure, other.to_string())
            }
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::StockLocation;

    #[test]
    fn test_core_error_keeps_available() {
        let err = DbError::from(CoreError::InsufficientStock {
            location: StockLocation::Warehouse,
            available: 12,
            requested: 20,
        });
        let outcome = Outcome::from(err);

        assert!(!outcome.success);
        assert_eq!(outcome.code, OutcomeCode::InsufficientStock);
        assert_eq!(outcome.available, Some(12));
    }

    #[test]
    fn test_storage_failure_carries_cause() {
        let outcome = Outcome::from(DbError::TransactionFailed("disk I/O error".into()));

        assert_eq!(outcome.code, OutcomeCode::StorageFailure);
        assert!(outcome.reason.unwrap().contains("disk I/O error"));
    }

    #[test]
    fn test_validation_converts() {
        let err = DbError::from(ValidationError::Required {
            field: "name".into(),
        });
        assert!(matches!(err.as_core(), Some(CoreError::Validation(_))));
    }
}
