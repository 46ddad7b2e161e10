//! # Seed Data
//!
//! Populates a store with the sample branches and goods for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p depot-db --bin seed
//!
//! # Specify database path
//! cargo run -p depot-db --bin seed -- --db ./data/depot.db
//! ```

use std::env;

use depot_db::{seed_sample_data, Database, DbConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./depot_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Depot Seed Data");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./depot_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => anyhow::bail!("unknown argument: {}", other),
        }
        i += 1;
    }

    println!("Depot Seed Data");
    println!("===============");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let report = seed_sample_data(&db).await?;

    if report.is_empty() {
        println!("⚠ Sample data already present, nothing to do.");
    } else {
        for name in &report.branches_added {
            println!("  + branch {}", name);
        }
        for name in &report.goods_added {
            println!("  + good {}", name);
        }
    }

    let totals = db.stats().conservation_total().await?;
    println!();
    println!(
        "✓ Seed complete: {} branches, {} goods, {} units in warehouse",
        db.branches().count().await?,
        db.goods().count().await?,
        totals.warehouse
    );

    db.close().await;
    Ok(())
}
