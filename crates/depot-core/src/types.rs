//! # Domain Types
//!
//! Core domain types used throughout Depot.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Good       │   │     Branch      │   │ BranchInventory │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  branch_id ─┐   │       │
//! │  │  name (unique)  │   │  name (unique)  │   │  good_id   ─┴PK │       │
//! │  │  quantity  ◄────┼───┼─ warehouse      │   │  quantity ≥ 0   │       │
//! │  │  price          │   │  location       │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  Append-only history: Distribution, Sale, ImportedGood                 │
//! │  Report rows:         SalesByBranchRow, DistributionHistoryRow,        │
//! │                       InventorySnapshotRow, StockTotals                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids are SQLite row ids. Quantities are signed so arithmetic never wraps,
//! but no stored quantity is ever negative.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::auth::Role;
use crate::money::Money;

// =============================================================================
// Reference Data
// =============================================================================

/// A good held in the central warehouse.
///
/// `quantity` is the stock not yet distributed to any branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Good {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub price: Money,
}

/// A named branch that receives and sells goods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub location: String,
}

/// Sellable stock of one good at one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BranchInventory {
    pub branch_id: i64,
    pub good_id: i64,
    pub quantity: i64,
}

/// A user account. The stored credential never leaves depot-db.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

// =============================================================================
// Stock Location
// =============================================================================

/// Where a quantity is held: the warehouse or a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "kind", content = "branch_id")]
pub enum StockLocation {
    Warehouse,
    Branch(i64),
}

impl StockLocation {
    /// Warehouse when no branch id is given.
    pub fn from_branch(branch_id: Option<i64>) -> Self {
        match branch_id {
            Some(id) => StockLocation::Branch(id),
            None => StockLocation::Warehouse,
        }
    }

    /// The branch id, `None` for the warehouse.
    pub fn branch_id(&self) -> Option<i64> {
        match self {
            StockLocation::Warehouse => None,
            StockLocation::Branch(id) => Some(*id),
        }
    }
}

impl fmt::Display for StockLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockLocation::Warehouse => write!(f, "warehouse"),
            StockLocation::Branch(id) => write!(f, "branch {}", id),
        }
    }
}

/// Current quantity at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockLevel {
    pub good_id: i64,
    pub location: StockLocation,
    pub quantity: i64,
}

// =============================================================================
// History Rows (append-only)
// =============================================================================

/// One movement of stock into a branch.
///
/// `from_branch_id` is `None` when the source was the warehouse, and also
/// when the source branch was later deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Distribution {
    pub id: i64,
    pub good_id: i64,
    pub from_branch_id: Option<i64>,
    pub to_branch_id: i64,
    pub quantity: i64,
    pub distribution_date: String,
    pub distributed_by_user_id: Option<i64>,
}

/// One sale against branch stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub good_id: i64,
    pub quantity: i64,
    pub sale_date: String,
    pub sold_by_user_id: Option<i64>,
    pub branch_id: Option<i64>,
}

/// External procurement into the warehouse.
///
/// `price` is the unit cost paid; `import_cost` is quantity × unit cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportedGood {
    pub id: i64,
    pub good_name: String,
    pub quantity: i64,
    pub price: Money,
    pub import_date: String,
    pub import_place: String,
    pub import_cost: Money,
}

// =============================================================================
// Requests
// =============================================================================

/// Move `quantity` of a good into `to_branch_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DistributionRequest {
    pub good_id: i64,
    /// `None` distributes from the warehouse.
    pub from_branch_id: Option<i64>,
    pub to_branch_id: i64,
    pub quantity: i64,
}

impl DistributionRequest {
    /// Distribution out of the warehouse.
    pub fn from_warehouse(good_id: i64, to_branch_id: i64, quantity: i64) -> Self {
        DistributionRequest {
            good_id,
            from_branch_id: None,
            to_branch_id,
            quantity,
        }
    }

    /// Transfer between two branches.
    pub fn between_branches(good_id: i64, from: i64, to: i64, quantity: i64) -> Self {
        DistributionRequest {
            good_id,
            from_branch_id: Some(from),
            to_branch_id: to,
            quantity,
        }
    }

    pub fn source(&self) -> StockLocation {
        StockLocation::from_branch(self.from_branch_id)
    }
}

/// Sell `quantity` of a good from a branch's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRequest {
    pub good_id: i64,
    pub branch_id: i64,
    pub quantity: i64,
}

/// Procurement of an existing good into the warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportRecord {
    pub good_id: i64,
    pub quantity: i64,
    pub unit_cost: Money,
    pub import_date: String,
    pub supplier: String,
    /// New selling price written to `goods.price`.
    pub sale_price: Money,
}

// =============================================================================
// Receipts
// =============================================================================

/// Result of adding stock by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GoodUpsert {
    /// A new row was created.
    Inserted { id: i64 },
    /// An existing row (matched case-insensitively) gained quantity.
    Incremented { id: i64, quantity: i64 },
}

impl GoodUpsert {
    pub fn id(&self) -> i64 {
        match self {
            GoodUpsert::Inserted { id } | GoodUpsert::Incremented { id, .. } => *id,
        }
    }
}

/// Committed distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DistributionReceipt {
    pub distribution_id: i64,
    pub source: StockLocation,
    pub source_remaining: i64,
    pub destination_quantity: i64,
    pub distribution_date: String,
    /// Display hint only: quantity × unit price × 20%.
    pub expected_margin: Money,
}

/// Committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleReceipt {
    pub sale_id: i64,
    pub remaining: i64,
    pub sale_date: String,
}

// =============================================================================
// Report Rows
// =============================================================================

/// Units sold per (branch, good).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesByBranchRow {
    pub branch_name: String,
    pub good_name: String,
    pub total_sold: i64,
}

/// One line of the distribution history report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DistributionHistoryRow {
    pub good_name: String,
    /// Source branch name, or "Warehouse".
    pub from_branch: String,
    pub to_branch: String,
    pub quantity: i64,
    pub distribution_date: String,
    /// `None` once the distributing user has been deleted.
    pub distributed_by: Option<String>,
}

/// Current stock of one good at one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventorySnapshotRow {
    pub branch_name: String,
    pub good_name: String,
    pub quantity: i64,
}

/// System-wide quantity totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockTotals {
    pub warehouse: i64,
    pub branches: i64,
    pub sold: i64,
}

impl StockTotals {
    /// Warehouse + branches + sold.
    ///
    /// Distribution only moves quantity and a sale moves it into `sold`, so
    /// without imports or new goods this sum never changes.
    pub fn conserved(&self) -> i64 {
        self.warehouse + self.branches + self.sold
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_location_from_branch() {
        assert_eq!(StockLocation::from_branch(None), StockLocation::Warehouse);
        assert_eq!(StockLocation::from_branch(Some(4)), StockLocation::Branch(4));
        assert_eq!(StockLocation::Branch(4).branch_id(), Some(4));
        assert_eq!(StockLocation::Warehouse.branch_id(), None);
    }

    #[test]
    fn test_distribution_request_source() {
        let req = DistributionRequest::from_warehouse(1, 2, 10);
        assert_eq!(req.source(), StockLocation::Warehouse);

        let req = DistributionRequest::between_branches(1, 2, 3, 10);
        assert_eq!(req.source(), StockLocation::Branch(2));
    }

    #[test]
    fn test_stock_location_serializes_tagged() {
        let json = serde_json::to_string(&StockLocation::Branch(3)).unwrap();
        assert_eq!(json, r#"{"kind":"branch","branch_id":3}"#);

        let json = serde_json::to_string(&StockLocation::Warehouse).unwrap();
        assert_eq!(json, r#"{"kind":"warehouse"}"#);
    }

    #[test]
    fn test_good_upsert_id() {
        assert_eq!(GoodUpsert::Inserted { id: 5 }.id(), 5);
        assert_eq!(GoodUpsert::Incremented { id: 6, quantity: 8 }.id(), 6);
    }

    #[test]
    fn test_conserved_total() {
        let totals = StockTotals {
            warehouse: 70,
            branches: 20,
            sold: 10,
        };
        assert_eq!(totals.conserved(), 100);
    }
}
