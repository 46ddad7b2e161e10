//! # Validation Module
//!
//! Input checks for Depot. Every check here runs before any store access,
//! so a rejected call never opens a transaction.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Caller (CLI / UI)                                            │
//! │  └── Parsing (clap, Money::parse)                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rules: positive quantities, non-empty names, ...        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── UNIQUE / NOT NULL constraints                                     │
//! │  └── Foreign keys with CASCADE / SET NULL                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::{MAX_NAME_LEN, TIMESTAMP_FORMAT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Trims `value` and checks it is non-empty and not too long.
///
/// Returns the trimmed value, which is what gets stored.
///
/// ```rust
/// use depot_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", "  Laptop ").unwrap(), "Laptop");
/// assert!(validate_name("name", "   ").is_err());
/// ```
pub fn validate_name<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(value)
}

/// Usernames: non-empty, no whitespace inside.
pub fn validate_username(username: &str) -> ValidationResult<&str> {
    let username = validate_name("username", username)?;

    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(username)
}

/// Passwords are only required to be non-empty.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` and returns the trimmed input.
pub fn validate_import_date(date: &str) -> ValidationResult<&str> {
    let date = date.trim();

    if date.is_empty() {
        return Err(ValidationError::Required {
            field: "import_date".to_string(),
        });
    }

    let parses = NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(date, TIMESTAMP_FORMAT).is_ok();

    if !parses {
        return Err(ValidationError::InvalidFormat {
            field: "import_date".to_string(),
            reason: "expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS".to_string(),
        });
    }

    Ok(date)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Movement quantities (distribute, sell, import) must be strictly positive.
///
/// ```rust
/// use depot_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(quantity: i64) -> Result<(), CoreError> {
    if quantity <= 0 {
        return Err(CoreError::InvalidQuantity);
    }
    Ok(())
}

/// Stock added by name may be zero (registering a good with no stock yet).
pub fn validate_stock_delta(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Prices and costs: zero allowed, negative rejected.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "Widget").unwrap(), "Widget");
        assert!(matches!(
            validate_name("name", ""),
            Err(ValidationError::Required { .. })
        ));

        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            validate_name("name", &long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username(" alice ").unwrap(), "alice");
        assert!(validate_username("al ice").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(10).is_ok());
        assert_eq!(validate_quantity(0), Err(CoreError::InvalidQuantity));
        assert_eq!(validate_quantity(-3), Err(CoreError::InvalidQuantity));
    }

    #[test]
    fn test_validate_stock_delta() {
        assert!(validate_stock_delta(0).is_ok());
        assert!(validate_stock_delta(-1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("price", Money::zero()).is_ok());
        assert!(validate_price("price", Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_import_date() {
        assert_eq!(validate_import_date("2024-03-01").unwrap(), "2024-03-01");
        assert!(validate_import_date("2024-03-01 09:30:00").is_ok());
        assert!(validate_import_date("01/03/2024").is_err());
        assert!(validate_import_date("2024-02-30").is_err());
        assert!(validate_import_date(" ").is_err());
    }
}
