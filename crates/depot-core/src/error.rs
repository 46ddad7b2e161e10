//! # Error Types
//!
//! Domain-specific error types for depot-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  depot-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule failures (not found, stock, ...) │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  depot-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures, wraps CoreError              │
//! │                                                                         │
//! │  Outcome (outcome.rs) - What the UI renders                            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → Outcome → UI            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::StockLocation;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule failures raised by the inventory core.
///
/// Every variant is detected before a mutation is written, so returning one
/// of these always means the store was left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Quantity was zero or negative.
    #[error("Quantity must be positive.")]
    InvalidQuantity,

    /// Input failed validation (empty name, negative price, ...).
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No good with this id.
    #[error("Good not found: {0}")]
    GoodNotFound(i64),

    /// No branch with this id.
    #[error("Branch not found: {0}")]
    BranchNotFound(i64),

    /// No user with this id or name.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The source branch has never received this good.
    ///
    /// Distinct from a zero quantity: the row does not exist at all.
    #[error("No inventory record in source branch {branch_id} for good {good_id}.")]
    NoSourceInventory { branch_id: i64, good_id: i64 },

    /// The selling branch has never received this good.
    #[error("No inventory record for good {good_id} at branch {branch_id}.")]
    NoInventoryRecord { branch_id: i64, good_id: i64 },

    /// The stock row exists but holds less than requested.
    ///
    /// ## User Workflow
    /// ```text
    /// Distribute 50 Laptops from Warehouse
    ///      │
    ///      ▼
    /// Check stock: available=30
    ///      │
    ///      ▼
    /// InsufficientStock { location: Warehouse, available: 30, requested: 50 }
    ///      │
    ///      ▼
    /// UI shows reason + "available: 30"
    /// ```
    #[error("Insufficient stock in {location}: available {available}, requested {requested}.")]
    InsufficientStock {
        location: StockLocation,
        available: i64,
        requested: i64,
    },

    /// Case-insensitive name collision.
    #[error("{entity} '{name}' already exists.")]
    DuplicateName { entity: String, name: String },

    /// Username or password did not match.
    #[error("Invalid username or password.")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("Credential error: {0}")]
    Credential(String),
}

impl CoreError {
    /// Creates a DuplicateName error.
    pub fn duplicate(entity: impl Into<String>, name: impl Into<String>) -> Self {
        CoreError::DuplicateName {
            entity: entity.into(),
            name: name.into(),
        }
    }

    /// Stock still available when the error is an `InsufficientStock`.
    pub fn available(&self) -> Option<i64> {
        match self {
            CoreError::InsufficientStock { available, .. } => Some(*available),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any store access.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., unparseable date or price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A derived amount does not fit the money range.
    #[error("{field} is too large")]
    OutOfRange { field: String },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            location: StockLocation::Warehouse,
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock in warehouse: available 3, requested 5."
        );
        assert_eq!(err.available(), Some(3));
    }

    #[test]
    fn test_branch_location_message() {
        let err = CoreError::InsufficientStock {
            location: StockLocation::Branch(7),
            available: 0,
            requested: 1,
        };
        assert!(err.to_string().contains("branch 7"));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "name is required");
        assert_eq!(core_err.available(), None);
    }

    #[test]
    fn test_duplicate_message() {
        let err = CoreError::duplicate("Branch", "Main");
        assert_eq!(err.to_string(), "Branch 'Main' already exists.");
    }
}
