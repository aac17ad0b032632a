//! Apply the POS schema (external one-time setup, idempotent).

use anyhow::Context;

use tillpoint_infra::DatabaseConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tillpoint_observability::init();

    let config = DatabaseConfig::from_env();
    let pool = config
        .connect()
        .await
        .context("failed to connect to Postgres")?;

    tracing::info!("running migrations");
    sqlx::raw_sql(include_str!("../../schema.sql"))
        .execute(&pool)
        .await
        .context("failed to apply schema")?;
    tracing::info!("migrations complete");

    pool.close().await;
    Ok(())
}
