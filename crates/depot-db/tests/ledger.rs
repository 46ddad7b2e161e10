//! End-to-end checks of the distribution and sales engines against a
//! file-backed store.

use depot_core::{
    ActorContext, CoreError, DistributionRequest, GoodUpsert, ImportRecord, Money, Outcome,
    OutcomeCode, Role, SaleRequest, StockLocation, StockTotals,
};
use depot_db::{Database, DbConfig};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    db: Database,
    actor: ActorContext,
}

async fn open(dir: &TempDir) -> Database {
    let config = DbConfig::new(dir.path().join("depot.db")).password_hash_cost(4);
    Database::new(config).await.unwrap()
}

async fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;
    let user = db
        .users()
        .create_user("clerk", "pw", Role::Staff)
        .await
        .unwrap();
    Fixture {
        _dir: dir,
        db,
        actor: ActorContext::new(user.id, Role::Staff),
    }
}

/// Makes every insert into `table` fail, after the earlier statements of
/// the same transaction have already run.
async fn fail_inserts_into(db: &Database, table: &str) {
    let sql = format!(
        "CREATE TRIGGER fail_{table} BEFORE INSERT ON {table} \
         BEGIN SELECT RAISE(ABORT, 'boom'); END"
    );
    sqlx::query(&sql).execute(db.pool()).await.unwrap();
}

fn assert_storage_failure(outcome: Outcome) {
    assert!(!outcome.success);
    assert_eq!(outcome.code, OutcomeCode::StorageFailure);
    assert!(outcome.reason.unwrap_or_default().contains("boom"));
}

fn sale(good_id: i64, branch_id: i64, quantity: i64) -> SaleRequest {
    SaleRequest {
        good_id,
        branch_id,
        quantity,
    }
}

#[tokio::test]
async fn distribute_then_sell_everything() {
    let f = fixture().await;
    let good = f
        .db
        .goods()
        .add_or_increment("Laptop", 100, Money::from_cents(99999))
        .await
        .unwrap()
        .id();
    let main = f.db.branches().add("Main", "City Center").await.unwrap().id;

    f.db.distributions()
        .distribute(DistributionRequest::from_warehouse(good, main, 10), &f.actor)
        .await
        .unwrap();
    assert_eq!(
        f.db.goods().stock_level(good, None).await.unwrap().quantity,
        90
    );

    let receipt = f
        .db
        .sales()
        .record_sale(sale(good, main, 10), &f.actor)
        .await
        .unwrap();
    assert_eq!(receipt.remaining, 0);

    assert_eq!(
        f.db.inventory().get(main, good).await.unwrap().unwrap().quantity,
        0
    );
    assert_eq!(f.db.goods().get_by_id(good).await.unwrap().unwrap().quantity, 90);
    assert_eq!(f.db.distributions().count().await.unwrap(), 1);
    assert_eq!(f.db.sales().count().await.unwrap(), 1);

    // the row stays at zero; selling again is a stock error, not a missing row
    let err = f
        .db
        .sales()
        .record_sale(sale(good, main, 1), &f.actor)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_core(),
        Some(&CoreError::InsufficientStock {
            location: StockLocation::Branch(main),
            available: 0,
            requested: 1,
        })
    );
}

#[tokio::test]
async fn units_are_conserved() {
    let f = fixture().await;
    let goods = f.db.goods();
    let laptop = goods
        .add_or_increment("Laptop", 100, Money::from_cents(99999))
        .await
        .unwrap()
        .id();
    let mouse = goods
        .add_or_increment("Mouse", 150, Money::from_cents(2550))
        .await
        .unwrap()
        .id();
    let a = f.db.branches().add("Main", "City Center").await.unwrap().id;
    let b = f.db.branches().add("East", "East Side").await.unwrap().id;

    let d = f.db.distributions();
    d.distribute(DistributionRequest::from_warehouse(laptop, a, 30), &f.actor)
        .await
        .unwrap();
    d.distribute(DistributionRequest::from_warehouse(mouse, b, 40), &f.actor)
        .await
        .unwrap();
    d.distribute(DistributionRequest::between_branches(laptop, a, b, 12), &f.actor)
        .await
        .unwrap();
    // rejected operations must not move anything
    assert!(d
        .distribute(DistributionRequest::from_warehouse(laptop, a, 1_000), &f.actor)
        .await
        .is_err());
    assert!(d
        .distribute(DistributionRequest::between_branches(mouse, a, b, 1), &f.actor)
        .await
        .is_err());

    let s = f.db.sales();
    s.record_sale(sale(laptop, a, 5), &f.actor).await.unwrap();
    s.record_sale(sale(laptop, b, 12), &f.actor).await.unwrap();
    s.record_sale(sale(mouse, b, 7), &f.actor).await.unwrap();
    assert!(s.record_sale(sale(mouse, a, 1), &f.actor).await.is_err());

    let totals = f.db.stats().conservation_total().await.unwrap();
    assert_eq!(
        totals,
        StockTotals {
            warehouse: 70 + 110,
            branches: 13 + 0 + 33,
            sold: 24,
        }
    );
    assert_eq!(totals.conserved(), 250);
}

#[tokio::test]
async fn insufficient_stock_leaves_store_untouched() {
    let f = fixture().await;
    let good = f
        .db
        .goods()
        .add_or_increment("Laptop", 5, Money::from_cents(99999))
        .await
        .unwrap()
        .id();
    let main = f.db.branches().add("Main", "City Center").await.unwrap().id;

    let err = f
        .db
        .distributions()
        .distribute(DistributionRequest::from_warehouse(good, main, 6), &f.actor)
        .await
        .unwrap_err();
    assert_eq!(err.as_core().and_then(CoreError::available), Some(5));

    assert_eq!(f.db.goods().get_by_id(good).await.unwrap().unwrap().quantity, 5);
    assert!(f.db.inventory().get(main, good).await.unwrap().is_none());
    assert_eq!(f.db.distributions().count().await.unwrap(), 0);
}

#[tokio::test]
async fn add_goods_is_case_insensitive() {
    let f = fixture().await;
    let goods = f.db.goods();

    let first = goods
        .add_or_increment("Widget", 5, Money::from_cents(1000))
        .await
        .unwrap();
    assert!(matches!(first, GoodUpsert::Inserted { .. }));

    let second = goods
        .add_or_increment("widget", 3, Money::from_cents(1200))
        .await
        .unwrap();
    assert_eq!(
        second,
        GoodUpsert::Incremented {
            id: first.id(),
            quantity: 8
        }
    );

    let all = goods.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Widget");
    assert_eq!(all[0].quantity, 8);
    assert_eq!(all[0].price, Money::from_cents(1000));
}

#[tokio::test]
async fn deleting_a_branch_cascades() {
    let f = fixture().await;
    let good = f
        .db
        .goods()
        .add_or_increment("Laptop", 100, Money::from_cents(99999))
        .await
        .unwrap()
        .id();
    let a = f.db.branches().add("Main", "City Center").await.unwrap().id;
    let b = f.db.branches().add("East", "East Side").await.unwrap().id;

    let d = f.db.distributions();
    d.distribute(DistributionRequest::from_warehouse(good, a, 20), &f.actor)
        .await
        .unwrap();
    d.distribute(DistributionRequest::between_branches(good, a, b, 5), &f.actor)
        .await
        .unwrap();
    f.db.sales()
        .record_sale(sale(good, a, 2), &f.actor)
        .await
        .unwrap();

    f.db.branches().delete(a).await.unwrap();

    assert!(f.db.inventory().list_for_branch(a).await.unwrap().is_empty());
    assert_eq!(f.db.sales().count().await.unwrap(), 0);

    let history = f.db.distributions().history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_branch_id, None);
    assert_eq!(history[0].to_branch_id, b);

    let report = f.db.stats().distribution_history().await.unwrap();
    assert_eq!(report[0].from_branch, "Warehouse");
    assert_eq!(report[0].to_branch, "East");

    assert_eq!(
        f.db.inventory().get(b, good).await.unwrap().unwrap().quantity,
        5
    );
}

#[tokio::test]
async fn deleting_a_good_cascades() {
    let f = fixture().await;
    let good = f
        .db
        .goods()
        .add_or_increment("Laptop", 100, Money::from_cents(99999))
        .await
        .unwrap()
        .id();
    let a = f.db.branches().add("Main", "City Center").await.unwrap().id;

    f.db.distributions()
        .distribute(DistributionRequest::from_warehouse(good, a, 10), &f.actor)
        .await
        .unwrap();
    f.db.sales()
        .record_sale(sale(good, a, 1), &f.actor)
        .await
        .unwrap();

    f.db.goods().delete(good).await.unwrap();

    assert!(f.db.inventory().get(a, good).await.unwrap().is_none());
    assert_eq!(f.db.distributions().count().await.unwrap(), 0);
    assert_eq!(f.db.sales().count().await.unwrap(), 0);
    assert_eq!(f.db.stats().conservation_total().await.unwrap(), StockTotals::default());
}

#[tokio::test]
async fn deleting_a_user_keeps_history() {
    let f = fixture().await;
    let good = f
        .db
        .goods()
        .add_or_increment("Laptop", 100, Money::from_cents(99999))
        .await
        .unwrap()
        .id();
    let a = f.db.branches().add("Main", "City Center").await.unwrap().id;

    f.db.distributions()
        .distribute(DistributionRequest::from_warehouse(good, a, 10), &f.actor)
        .await
        .unwrap();
    f.db.sales()
        .record_sale(sale(good, a, 3), &f.actor)
        .await
        .unwrap();

    f.db.users().delete_user(f.actor.user_id).await.unwrap();

    let sales = f.db.sales().list().await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].sold_by_user_id, None);

    let history = f.db.distributions().history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].distributed_by_user_id, None);
}

#[tokio::test]
async fn reopening_adopts_existing_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let db = open(&dir).await;
        db.goods()
            .add_or_increment("Laptop", 7, Money::from_cents(99999))
            .await
            .unwrap();
        db.close().await;
    }

    let db = open(&dir).await;
    let (total, applied) = db.migration_status().await.unwrap();
    assert_eq!(total, applied);

    let laptop = db.goods().find_by_name("LAPTOP").await.unwrap().unwrap();
    assert_eq!(laptop.quantity, 7);
}

#[tokio::test]
async fn failed_history_insert_rolls_back_distribution() {
    let f = fixture().await;
    let good = f
        .db
        .goods()
        .add_or_increment("Laptop", 100, Money::from_cents(99999))
        .await
        .unwrap()
        .id();
    let main = f.db.branches().add("Main", "City Center").await.unwrap().id;
    fail_inserts_into(&f.db, "distributions").await;

    let err = f
        .db
        .distributions()
        .distribute(DistributionRequest::from_warehouse(good, main, 10), &f.actor)
        .await
        .unwrap_err();
    assert_storage_failure(Outcome::from(err));

    assert_eq!(f.db.goods().get_by_id(good).await.unwrap().unwrap().quantity, 100);
    assert!(f.db.inventory().get(main, good).await.unwrap().is_none());
    assert_eq!(f.db.distributions().count().await.unwrap(), 0);
}

#[tokio::test]
async fn failed_sale_insert_rolls_back_decrement() {
    let f = fixture().await;
    let good = f
        .db
        .goods()
        .add_or_increment("Laptop", 100, Money::from_cents(99999))
        .await
        .unwrap()
        .id();
    let main = f.db.branches().add("Main", "City Center").await.unwrap().id;
    f.db.distributions()
        .distribute(DistributionRequest::from_warehouse(good, main, 10), &f.actor)
        .await
        .unwrap();
    fail_inserts_into(&f.db, "sales").await;

    let err = f
        .db
        .sales()
        .record_sale(sale(good, main, 4), &f.actor)
        .await
        .unwrap_err();
    assert_storage_failure(Outcome::from(err));

    assert_eq!(f.db.inventory().get(main, good).await.unwrap().unwrap().quantity, 10);
    assert_eq!(f.db.sales().count().await.unwrap(), 0);
}

#[tokio::test]
async fn failed_import_history_rolls_back_stock_and_price() {
    let f = fixture().await;
    let good = f
        .db
        .goods()
        .add_or_increment("Laptop", 100, Money::from_cents(99999))
        .await
        .unwrap()
        .id();
    fail_inserts_into(&f.db, "imported_goods").await;

    let err = f
        .db
        .imports()
        .record(&ImportRecord {
            good_id: good,
            quantity: 20,
            unit_cost: Money::from_cents(80000),
            import_date: "2024-05-02".to_string(),
            supplier: "Acme Traders".to_string(),
            sale_price: Money::from_cents(109900),
        })
        .await
        .unwrap_err();
    assert_storage_failure(Outcome::from(err));

    let stored = f.db.goods().get_by_id(good).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 100);
    assert_eq!(stored.price, Money::from_cents(99999));
    assert_eq!(f.db.imports().count().await.unwrap(), 0);
}
