//! Integration tests for the store boundary.
//!
//! The in-memory store exercises the full checkout semantics (atomicity,
//! snapshot pricing, the concurrency race) without a database. The Postgres
//! tests run the same scenarios against a real instance and are ignored by
//! default; point `DATABASE_URL` at a disposable database and run
//! `cargo test -- --ignored` to include them.

use std::sync::Arc;

use tillpoint_inventory::ProductDraft;
use tillpoint_sales::{CheckoutError, LineItemRequest};

use crate::error::StoreError;
use crate::store::{InMemoryPosStore, PosStore};

fn item(product_id: i64, quantity: i64) -> LineItemRequest {
    LineItemRequest {
        product_id,
        quantity,
    }
}

async fn seed_coffee(store: &impl PosStore, stock_qty: i64) -> tillpoint_inventory::Product {
    store
        .upsert_product(&ProductDraft::new("SKU-001", "Coffee", 300, stock_qty).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn committed_sale_totals_and_decrements_stock() {
    let store = InMemoryPosStore::new();
    let coffee = seed_coffee(&store, 100).await;

    let sale = store
        .create_sale(&[item(coffee.id.as_i64(), 2)])
        .await
        .unwrap();

    assert_eq!(sale.total_cents, 600);
    let products = store.list_products().await.unwrap();
    assert_eq!(products[0].stock_qty, 98);

    let items = store.items_for(sale.id).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].unit_price_cents, 300);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(
        sale.total_cents,
        items.iter().map(|i| i.quantity * i.unit_price_cents).sum::<i64>()
    );
}

#[tokio::test]
async fn failed_sale_leaves_no_trace() {
    let store = InMemoryPosStore::new();
    let coffee = seed_coffee(&store, 100).await;

    // Second line references a product that does not exist; the whole
    // request must fail without touching the first line's stock.
    let err = store
        .create_sale(&[item(coffee.id.as_i64(), 2), item(999, 1)])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Checkout(CheckoutError::ProductNotFound(_))
    ));

    assert_eq!(store.list_products().await.unwrap()[0].stock_qty, 100);
    assert!(store.list_sales(50).await.unwrap().is_empty());
}

#[tokio::test]
async fn insufficient_stock_aborts_without_mutation() {
    let store = InMemoryPosStore::new();
    let coffee = seed_coffee(&store, 0).await;

    let err = store
        .create_sale(&[item(coffee.id.as_i64(), 1)])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Checkout(CheckoutError::InsufficientStock { available: 0, .. })
    ));
    assert_eq!(store.list_products().await.unwrap()[0].stock_qty, 0);
    assert!(store.list_sales(50).await.unwrap().is_empty());
}

#[tokio::test]
async fn racing_sales_never_oversell() {
    let store = Arc::new(InMemoryPosStore::new());
    let coffee = seed_coffee(store.as_ref(), 1).await;
    let product_id = coffee.id.as_i64();

    let a = {
        let store = store.clone();
        tokio::spawn(async move { store.create_sale(&[item(product_id, 1)]).await })
    };
    let b = {
        let store = store.clone();
        tokio::spawn(async move { store.create_sale(&[item(product_id, 1)]).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one of the racing sales may commit");
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result,
            Err(StoreError::Checkout(CheckoutError::InsufficientStock { .. }))
        ));
    }

    let stock = store.list_products().await.unwrap()[0].stock_qty;
    assert_eq!(stock, 0, "stock must never go negative");
}

#[tokio::test]
async fn later_price_change_does_not_rewrite_recorded_sale() {
    let store = InMemoryPosStore::new();
    let coffee = seed_coffee(&store, 100).await;

    let sale = store
        .create_sale(&[item(coffee.id.as_i64(), 1)])
        .await
        .unwrap();

    // Administrative price update after the sale committed.
    store
        .upsert_product(&ProductDraft::new("SKU-001", "Coffee", 999, 99).unwrap())
        .await
        .unwrap();

    let items = store.items_for(sale.id).await;
    assert_eq!(items[0].unit_price_cents, 300);
    assert_eq!(store.list_sales(50).await.unwrap()[0].total_cents, 300);
}

#[tokio::test]
async fn upsert_preserves_id_and_refreshes_fields() {
    let store = InMemoryPosStore::new();
    let first = seed_coffee(&store, 10).await;

    let second = store
        .upsert_product(&ProductDraft::new("SKU-001", "Espresso", 350, 20).unwrap())
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.name, "Espresso");
    assert_eq!(second.price_cents, 350);
    assert_eq!(second.stock_qty, 20);
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(store.list_products().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sales_list_is_newest_first_and_bounded() {
    let store = InMemoryPosStore::new();
    let coffee = seed_coffee(&store, 100).await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(
            store
                .create_sale(&[item(coffee.id.as_i64(), 1)])
                .await
                .unwrap()
                .id,
        );
    }

    let sales = store.list_sales(2).await.unwrap();
    assert_eq!(sales.len(), 2);
    assert_eq!(sales[0].id, ids[2]);
    assert_eq!(sales[1].id, ids[1]);
}

mod postgres {
    //! Same scenarios against a live Postgres. Ignored unless pointed at a
    //! disposable database via `DATABASE_URL`.

    use super::*;
    use crate::config::DatabaseConfig;
    use crate::store::PostgresPosStore;

    async fn connect_store() -> (sqlx::PgPool, PostgresPosStore) {
        let pool = DatabaseConfig::from_env()
            .connect()
            .await
            .expect("DATABASE_URL must point at a reachable Postgres");
        sqlx::raw_sql(include_str!("../schema.sql"))
            .execute(&pool)
            .await
            .expect("failed to apply schema");
        sqlx::raw_sql("TRUNCATE sale_items, sales, products RESTART IDENTITY CASCADE")
            .execute(&pool)
            .await
            .expect("failed to reset tables");
        (pool.clone(), PostgresPosStore::new(pool))
    }

    #[tokio::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn checkout_commits_atomically() {
        let (pool, store) = connect_store().await;
        let coffee = seed_coffee(&store, 100).await;

        let sale = store
            .create_sale(&[item(coffee.id.as_i64(), 2)])
            .await
            .unwrap();
        assert_eq!(sale.total_cents, 600);
        assert_eq!(store.list_products().await.unwrap()[0].stock_qty, 98);

        pool.close().await;
    }

    #[tokio::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn checkout_rejection_rolls_back_and_surfaces_the_business_error() {
        let (pool, store) = connect_store().await;
        let coffee = seed_coffee(&store, 100).await;

        // The rejection must come back as the checkout failure, never as a
        // storage fault from the abort path, and must leave no trace.
        let err = store
            .create_sale(&[item(coffee.id.as_i64(), 2), item(999, 1)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Checkout(CheckoutError::ProductNotFound(_))
        ));
        assert_eq!(store.list_products().await.unwrap()[0].stock_qty, 100);
        assert!(store.list_sales(50).await.unwrap().is_empty());

        pool.close().await;
    }

    #[tokio::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn racing_checkouts_serialize_on_row_locks() {
        let (pool, store) = connect_store().await;
        let coffee = seed_coffee(&store, 1).await;
        let product_id = coffee.id.as_i64();
        let store = Arc::new(store);

        let a = {
            let store = store.clone();
            tokio::spawn(async move { store.create_sale(&[item(product_id, 1)]).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { store.create_sale(&[item(product_id, 1)]).await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(store.list_products().await.unwrap()[0].stock_qty, 0);

        pool.close().await;
    }
}
