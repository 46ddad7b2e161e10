//! # Money Module
//!
//! Provides the `Money` type for prices, import costs and margin estimates.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  The store keeps prices in a REAL column. We convert to integer cents  │
//! │  exactly once at the storage boundary (from_real / to_real) and do     │
//! │  all arithmetic in cents.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use depot_core::money::{Money, Rate};
//!
//! let price = Money::from_cents(99999); // 999.99
//! let stock_value = price.multiply_quantity(10); // Some(9999.90)
//! assert_eq!(stock_value.map(|v| v.cents()), Some(999990));
//!
//! let margin = price.percentage_of_quantity(10, Rate::from_bps(2000));
//! assert_eq!(margin.cents(), 199998);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Rate
// =============================================================================

/// A proportional rate in basis points (bps).
///
/// 1 basis point = 0.01%; 2000 bps = 20%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// goods.price (REAL) ──from_real──► Good.price ──► unit price lookups
///                                        │
///                                        └──► quantity × price × 20% margin
///
/// imported_goods.price / import_cost (REAL) ◄──to_real── ImportRecord
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use depot_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a `REAL` column value, rounding to the nearest cent.
    ///
    /// ```rust
    /// use depot_core::money::Money;
    ///
    /// assert_eq!(Money::from_real(999.99).cents(), 99999);
    /// assert_eq!(Money::from_real(25.5).cents(), 2550);
    /// ```
    pub fn from_real(value: f64) -> Self {
        Money((value * 100.0).round() as i64)
    }

    /// Converts to the `REAL` representation used by the store.
    pub fn to_real(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parses a decimal amount such as `"12"`, `"12.5"` or `"12.50"`.
    ///
    /// At most two fractional digits are accepted; anything finer would be
    /// silently rounded, so it is rejected instead.
    ///
    /// ```rust
    /// use depot_core::money::Money;
    ///
    /// assert_eq!(Money::parse("999.99").unwrap().cents(), 99999);
    /// assert_eq!(Money::parse("10").unwrap().cents(), 1000);
    /// assert!(Money::parse("1.999").is_err());
    /// assert!(Money::parse("ten").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Money, ValidationError> {
        let invalid = || ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not a decimal amount like 12.50", input.trim()),
        };

        let text = input.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (major, minor) = digits.split_once('.').unwrap_or((digits, ""));

        if major.is_empty() && minor.is_empty() {
            return Err(invalid());
        }
        if minor.len() > 2
            || !major.chars().all(|c| c.is_ascii_digit())
            || !minor.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let major: i64 = if major.is_empty() {
            0
        } else {
            major.parse().map_err(|_| invalid())?
        };
        let minor: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => minor.parse().map_err(|_| invalid())?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(invalid)?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a basis-point rate, rounding half away from zero on the cent.
    ///
    /// ```rust
    /// use depot_core::money::{Money, Rate};
    ///
    /// let value = Money::from_cents(1000);
    /// assert_eq!(value.percentage(Rate::from_bps(2000)).cents(), 200);
    /// ```
    pub fn percentage(&self, rate: Rate) -> Money {
        self.percentage_of_quantity(1, rate)
    }

    /// Applies a basis-point rate to `qty` units at this price.
    ///
    /// The product `cents * qty * bps` is taken in i128; a result beyond the
    /// i64 range saturates instead of wrapping.
    pub fn percentage_of_quantity(&self, qty: i64, rate: Rate) -> Money {
        let raw = (self.0 as i128)
            .saturating_mul(qty as i128)
            .saturating_mul(rate.bps() as i128);
        let rounded = if raw >= 0 {
            raw.saturating_add(5000) / 10000
        } else {
            raw.saturating_sub(5000) / 10000
        };
        Money(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies money by a quantity, `None` on overflow.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal display, no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_real_round_trip_keeps_cents() {
        for cents in [0, 1, 99, 2550, 99999, 123456789] {
            let money = Money::from_cents(cents);
            assert_eq!(Money::from_real(money.to_real()), money);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("25.5").unwrap().cents(), 2550);
        assert_eq!(Money::parse(" 0.07 ").unwrap().cents(), 7);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse("5.").unwrap().cents(), 500);
        assert_eq!(Money::parse("-1.25").unwrap().cents(), -125);

        assert!(Money::parse("").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("1,50").is_err());
        assert!(Money::parse("1.234").is_err());
        assert!(Money::parse("1e3").is_err());
    }

    #[test]
    fn test_margin_percentage() {
        // 10 Mice at 25.50 → 255.00 → 20% = 51.00
        let price = Money::from_cents(2550);
        assert_eq!(price.percentage_of_quantity(10, Rate::from_bps(2000)).cents(), 5100);

        // Rounds on the half cent: 0.05 × 50% = 0.025 → 0.03
        assert_eq!(Money::from_cents(5).percentage(Rate::from_bps(5000)).cents(), 3);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.multiply_quantity(3), Some(Money::from_cents(3000)));

        let mut total = Money::zero();
        total += a;
        assert_eq!(total, a);
        assert!(!total.is_negative());
        assert!((b - a).is_negative());
    }

    #[test]
    fn test_multiply_quantity_overflow() {
        let price = Money::from_cents(99999);
        assert_eq!(price.multiply_quantity(100_000_000_000_000_000), None);
        assert_eq!(Money::zero().multiply_quantity(i64::MAX), Some(Money::zero()));
    }

    #[test]
    fn test_margin_on_huge_quantity_saturates() {
        let price = Money::from_cents(99999);
        let rate = Rate::from_bps(2000);

        // 10^17 units at 999.99: 20% is 1.99998e21 cents, beyond i64
        assert_eq!(price.percentage_of_quantity(100_000_000_000_000_000, rate).cents(), i64::MAX);

        // 10^12 units still fit: 99999 * 10^12 * 0.2
        assert_eq!(
            price.percentage_of_quantity(1_000_000_000_000, rate).cents(),
            19_999_800_000_000_000
        );
    }
}
