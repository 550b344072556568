//! Postgres integration tests for the stock-moving stores.
//!
//! Ignored by default; point `DATABASE_URL` at a disposable database and run
//! `cargo test -p farmgate-infra -- --ignored`.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sqlx::PgPool;

use farmgate_core::{DomainError, Quantity};
use farmgate_farms::{Farm, NewFarm};
use farmgate_infra::stores::{
    FarmStore, PartyStore, ProductStore, ProductionStore, SupplyStore,
};
use farmgate_infra::{connect, run_migrations, StoreError};
use farmgate_parties::{ContactInfo, NewParty, PartyKind};
use farmgate_production::{NewProduction, ProductionStatus};
use farmgate_products::{NewProduct, Product};
use farmgate_supplies::{NewSupply, Supply, UsageLine};

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let pool = connect(&url).await.expect("connect");
    run_migrations(&pool).await.expect("migrate");
    pool
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
}

struct Fixture {
    farm: Farm,
    supply: Supply,
    product: Product,
}

/// Fresh farm + supplier + 100 kg of one supply + one product.
async fn fixture(pool: &PgPool) -> Fixture {
    let parties = PartyStore::new(pool.clone());
    let supplier = parties
        .create(
            NewParty::new(
                PartyKind::Supplier,
                "Agroinsumos SA".into(),
                "900123456".into(),
                ContactInfo::default(),
                None,
                Some("Agroinsumos".into()),
            )
            .unwrap(),
        )
        .await
        .unwrap();
    let owner = parties
        .create(
            NewParty::new(
                PartyKind::Employee,
                "Ana Ruiz".into(),
                "1002003004".into(),
                ContactInfo::default(),
                Some("administrator".into()),
                None,
            )
            .unwrap(),
        )
        .await
        .unwrap();

    let farm = FarmStore::new(pool.clone())
        .create(NewFarm::new("La Esperanza".into(), "Cauca".into(), None, owner.id).unwrap())
        .await
        .unwrap();

    let supply = SupplyStore::new(pool.clone())
        .create(
            NewSupply::new(
                "Urea".into(),
                "kg".into(),
                Quantity::new(dec!(100)).unwrap(),
                farm.id,
                supplier.id,
            )
            .unwrap(),
        )
        .await
        .unwrap();

    let product = ProductStore::new(pool.clone())
        .create(NewProduct::new("Café pergamino".into(), None, "kg".into()).unwrap())
        .await
        .unwrap();

    Fixture {
        farm,
        supply,
        product,
    }
}

fn sown_with_lines(fx: &Fixture, lines: Vec<UsageLine>) -> NewProduction {
    NewProduction::new(
        fx.farm.id,
        fx.product.id,
        date(1),
        ProductionStatus::Sown,
        None,
        None,
        lines,
    )
    .unwrap()
}

fn line(fx: &Fixture, qty: rust_decimal::Decimal) -> UsageLine {
    UsageLine::new(fx.supply.id, Quantity::positive(qty).unwrap(), date(1)).unwrap()
}

#[tokio::test]
#[ignore = "needs a Postgres instance via DATABASE_URL"]
async fn over_consumption_is_rejected_and_leaves_stock_unchanged() {
    let pool = pool().await;
    let fx = fixture(&pool).await;
    let productions = ProductionStore::new(pool.clone());
    let supplies = SupplyStore::new(pool.clone());

    let err = productions
        .create(sown_with_lines(&fx, vec![line(&fx, dec!(150))]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(DomainError::InsufficientStock { .. })
    ));

    // The aborted transaction must not have touched the supply.
    let supply = supplies.get(fx.supply.id).await.unwrap();
    assert_eq!(supply.available.value(), dec!(100));
    assert!(supplies.history(fx.supply.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "needs a Postgres instance via DATABASE_URL"]
async fn usage_edits_reconcile_stock_by_diff() {
    let pool = pool().await;
    let fx = fixture(&pool).await;
    let productions = ProductionStore::new(pool.clone());
    let supplies = SupplyStore::new(pool.clone());

    let cycle = productions
        .create(sown_with_lines(&fx, vec![line(&fx, dec!(40))]))
        .await
        .unwrap();
    assert_eq!(
        supplies.get(fx.supply.id).await.unwrap().available.value(),
        dec!(60)
    );

    // Shrink the line: only the difference returns to stock.
    productions
        .update(cycle.id, sown_with_lines(&fx, vec![line(&fx, dec!(25))]))
        .await
        .unwrap();
    assert_eq!(
        supplies.get(fx.supply.id).await.unwrap().available.value(),
        dec!(75)
    );

    // Deleting restocks the remainder in full.
    productions.delete(cycle.id).await.unwrap();
    assert_eq!(
        supplies.get(fx.supply.id).await.unwrap().available.value(),
        dec!(100)
    );

    // Every decrement left a history row; restocks did not.
    let history = supplies.history(fx.supply.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].quantity_used.value(), dec!(40));
}

#[tokio::test]
#[ignore = "needs a Postgres instance via DATABASE_URL"]
async fn harvest_is_terminal_and_fills_inventory() {
    let pool = pool().await;
    let fx = fixture(&pool).await;
    let productions = ProductionStore::new(pool.clone());
    let products = ProductStore::new(pool.clone());

    let cycle = productions
        .create(sown_with_lines(&fx, Vec::new()))
        .await
        .unwrap();

    let harvested = productions
        .harvest(cycle.id, Quantity::positive(dec!(80)).unwrap(), date(20))
        .await
        .unwrap();
    assert_eq!(harvested.status, ProductionStatus::Harvested);

    let inventory = products.inventory(fx.product.id).await.unwrap();
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].quantity.value(), dec!(80));
    assert_eq!(inventory[0].farm_id, fx.farm.id);

    // Second harvest, edits and deletion are all conflicts now.
    let again = productions
        .harvest(cycle.id, Quantity::positive(dec!(1)).unwrap(), date(21))
        .await
        .unwrap_err();
    assert!(matches!(again, StoreError::Domain(DomainError::Conflict(_))));

    let edit = productions
        .update(cycle.id, sown_with_lines(&fx, Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(edit, StoreError::Domain(DomainError::Conflict(_))));

    let delete = productions.delete(cycle.id).await.unwrap_err();
    assert!(matches!(delete, StoreError::Domain(DomainError::Conflict(_))));
}
