//! Seed the demo catalog (upserts, safe to re-run).

use anyhow::Context;

use tillpoint_infra::{DatabaseConfig, PosStore, PostgresPosStore};
use tillpoint_inventory::ProductDraft;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tillpoint_observability::init();

    let config = DatabaseConfig::from_env();
    let pool = config
        .connect()
        .await
        .context("failed to connect to Postgres")?;
    let store = PostgresPosStore::new(pool.clone());

    tracing::info!("seeding demo data");
    let products = [
        ("SKU-001", "Coffee", 300, 100),
        ("SKU-002", "Tea", 250, 80),
        ("SKU-003", "Sandwich", 650, 40),
        ("SKU-004", "Cake Slice", 450, 50),
    ];
    for (sku, name, price_cents, stock_qty) in products {
        let draft = ProductDraft::new(sku, name, price_cents, stock_qty)
            .with_context(|| format!("invalid seed product {sku}"))?;
        let product = store
            .upsert_product(&draft)
            .await
            .with_context(|| format!("failed to seed {sku}"))?;
        tracing::info!(id = %product.id, sku = %product.sku, "seeded product");
    }
    tracing::info!("seed complete");

    pool.close().await;
    Ok(())
}
