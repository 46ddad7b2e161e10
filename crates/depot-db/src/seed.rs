//! # Sample Data
//!
//! Two branches and two goods for a fresh store. Shared by the `seed` binary
//! and the CLI `seed` command.
//!
//! | Kind   | Name   | Detail             |
//! |--------|--------|--------------------|
//! | Branch | Main   | City Center        |
//! | Branch | East   | East Side          |
//! | Good   | Laptop | 100 units @ 999.99 |
//! | Good   | Mouse  | 150 units @ 25.50  |
//!
//! Anything already present (by case-insensitive name) is left alone, so
//! seeding twice is a no-op.

use serde::Serialize;
use tracing::info;

use crate::error::DbResult;
use crate::Database;
use depot_core::Money;

const SAMPLE_BRANCHES: &[(&str, &str)] = &[("Main", "City Center"), ("East", "East Side")];

const SAMPLE_GOODS: &[(&str, i64, Money)] = &[
    ("Laptop", 100, Money::from_cents(99999)),
    ("Mouse", 150, Money::from_cents(2550)),
];

/// What a seeding run inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub branches_added: Vec<String>,
    pub goods_added: Vec<String>,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.branches_added.is_empty() && self.goods_added.is_empty()
    }
}

/// Inserts the sample branches and goods that are missing.
pub async fn seed_sample_data(db: &Database) -> DbResult<SeedReport> {
    let mut report = SeedReport::default();

    let existing: Vec<String> = db
        .branches()
        .list()
        .await?
        .into_iter()
        .map(|b| b.name.to_lowercase())
        .collect();

    for (name, location) in SAMPLE_BRANCHES {
        if existing.contains(&name.to_lowercase()) {
            continue;
        }
        db.branches().add(name, location).await?;
        report.branches_added.push(name.to_string());
    }

    for (name, quantity, price) in SAMPLE_GOODS {
        if db.goods().find_by_name(name).await?.is_some() {
            continue;
        }
        db.goods().add_or_increment(name, *quantity, *price).await?;
        report.goods_added.push(name.to_string());
    }

    info!(
        branches = report.branches_added.len(),
        goods = report.goods_added.len(),
        "Sample data seeded"
    );

    Ok(report)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::db;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = db().await;

        let first = seed_sample_data(&db).await.unwrap();
        assert_eq!(first.branches_added, vec!["Main", "East"]);
        assert_eq!(first.goods_added, vec!["Laptop", "Mouse"]);

        let second = seed_sample_data(&db).await.unwrap();
        assert!(second.is_empty());

        let laptop = db.goods().find_by_name("laptop").await.unwrap().unwrap();
        assert_eq!(laptop.quantity, 100);
        assert_eq!(laptop.price, Money::from_cents(99999));
        assert_eq!(db.branches().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_seed_keeps_existing_rows() {
        let db = db().await;
        db.goods()
            .add_or_increment("mouse", 3, Money::from_cents(100))
            .await
            .unwrap();

        let report = seed_sample_data(&db).await.unwrap();
        assert_eq!(report.goods_added, vec!["Laptop"]);

        let mouse = db.goods().find_by_name("Mouse").await.unwrap().unwrap();
        assert_eq!(mouse.quantity, 3);
    }
}
