//! Goods ledger and import commands.

use tracing::debug;

use depot_core::{CoreError, ImportRecord, Outcome, Permission};
use depot_db::DbError;

use crate::cli::{GoodsCommand, ImportArgs};
use crate::error::CliError;
use crate::state::AppState;

pub async fn run(state: &AppState, command: GoodsCommand) -> Result<Outcome, CliError> {
    let goods = state.db().goods();

    match command {
        GoodsCommand::Add {
            name,
            quantity,
            price,
        } => {
            state.require(Permission::AddGoods, "add goods")?;
            let upsert = goods.add_or_increment(&name, quantity, price).await?;
            Ok(Outcome::with_data(&upsert))
        }

        GoodsCommand::List => Ok(Outcome::with_data(&goods.list_all().await?)),

        GoodsCommand::Find { name } => {
            debug!(name = %name, "Looking up good");
            let good = goods
                .find_by_name(&name)
                .await?
                .ok_or_else(|| DbError::not_found("Good", &name))?;
            Ok(Outcome::with_data(&good))
        }

        GoodsCommand::Price { good } => {
            let price = goods
                .unit_price(good)
                .await?
                .ok_or(CoreError::GoodNotFound(good))?;
            Ok(Outcome::with_data(&price))
        }

        GoodsCommand::Update { good, name, price } => {
            state.require(Permission::ManageGoods, "edit goods")?;
            Ok(Outcome::with_data(&goods.update(good, &name, price).await?))
        }

        GoodsCommand::Delete { good } => {
            state.require(Permission::ManageGoods, "delete goods")?;
            goods.delete(good).await?;
            Ok(Outcome::ok())
        }
    }
}

pub async fn import(state: &AppState, args: ImportArgs) -> Result<Outcome, CliError> {
    state.require(Permission::RecordImport, "record imports")?;

    let record = ImportRecord {
        good_id: args.good,
        quantity: args.quantity,
        unit_cost: args.unit_cost,
        import_date: args.date,
        supplier: args.supplier,
        sale_price: args.sale_price,
    };

    let imported = state.db().imports().record(&record).await?;
    Ok(Outcome::with_data(&imported))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::state_as;
    use depot_core::{Money, OutcomeCode, Role};

    #[tokio::test]
    async fn test_every_role_can_add_goods() {
        for role in [Role::Admin, Role::Staff, Role::User] {
            let state = state_as(role).await;
            let outcome = run(
                &state,
                GoodsCommand::Add {
                    name: "laptop".to_string(),
                    quantity: 5,
                    price: Money::from_cents(1),
                },
            )
            .await
            .unwrap();

            assert!(outcome.success);
            let data = outcome.data.unwrap();
            assert_eq!(data["kind"], "incremented");
            assert_eq!(data["quantity"], 105);
        }
    }

    #[tokio::test]
    async fn test_only_admin_deletes_goods() {
        let state = state_as(Role::Staff).await;
        let err = run(&state, GoodsCommand::Delete { good: 1 })
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Forbidden { .. }));

        let state = state_as(Role::Admin).await;
        assert!(run(&state, GoodsCommand::Delete { good: 1 })
            .await
            .unwrap()
            .success);
        assert_eq!(state.db().goods().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_price_of_missing_good() {
        let state = state_as(Role::User).await;
        let err = run(&state, GoodsCommand::Price { good: 99 })
            .await
            .unwrap_err();
        assert_eq!(Outcome::from(err).code, OutcomeCode::NotFound);

        let outcome = run(&state, GoodsCommand::Price { good: 1 }).await.unwrap();
        assert_eq!(outcome.data, Some(serde_json::json!(99999)));
    }

    #[tokio::test]
    async fn test_import_requires_staff() {
        let args = || ImportArgs {
            good: 2,
            quantity: 10,
            unit_cost: Money::from_cents(1500),
            date: "2024-03-01".to_string(),
            supplier: "Acme".to_string(),
            sale_price: Money::from_cents(2999),
        };

        let state = state_as(Role::User).await;
        assert!(matches!(
            import(&state, args()).await.unwrap_err(),
            CliError::Forbidden { .. }
        ));

        let state = state_as(Role::Staff).await;
        let outcome = import(&state, args()).await.unwrap();
        assert!(outcome.success);

        let mouse = state.db().goods().get_by_id(2).await.unwrap().unwrap();
        assert_eq!(mouse.quantity, 160);
        assert_eq!(mouse.price, Money::from_cents(2999));
    }
}
