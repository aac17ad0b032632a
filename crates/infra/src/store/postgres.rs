//! Postgres-backed POS store.
//!
//! The sale-creation transaction follows the lock-then-validate-then-mutate
//! pattern: one `SELECT ... FOR UPDATE` for the whole distinct product set,
//! acquired up front and before any mutation. Two concurrent sales over
//! overlapping products therefore serialize on the row locks, and neither
//! can price or check stock against a snapshot the other is about to
//! invalidate. Acquiring the full set in a single statement also avoids
//! lock-ordering deadlocks between sales that touch the same products in
//! different orders.
//!
//! ## Thread safety
//!
//! `PostgresPosStore` is `Send + Sync`; all operations go through the SQLx
//! connection pool.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use tillpoint_core::{ProductId, SaleId};
use tillpoint_inventory::{Product, ProductDraft, StockSnapshot};
use tillpoint_sales::{CheckoutError, LineItemRequest, Sale, price_order, validate_items};

use crate::error::{StoreError, StoreResult, map_sqlx_error};
use crate::store::r#trait::PosStore;

/// Postgres implementation of [`PosStore`].
#[derive(Debug, Clone)]
pub struct PostgresPosStore {
    pool: Arc<PgPool>,
}

impl PostgresPosStore {
    /// Create a store backed by the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl PosStore for PostgresPosStore {
    #[instrument(skip(self), err)]
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sku, name, price_cents, stock_qty, created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            let product = ProductRow::from_row(&row)
                .map_err(|e| StoreError::storage("list_products", e.to_string()))?;
            products.push(product.into());
        }
        Ok(products)
    }

    #[instrument(skip(self, draft), fields(sku = draft.sku()), err)]
    async fn upsert_product(&self, draft: &ProductDraft) -> StoreResult<Product> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (sku, name, price_cents, stock_qty)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (sku) DO UPDATE SET
                name = EXCLUDED.name,
                price_cents = EXCLUDED.price_cents,
                stock_qty = EXCLUDED.stock_qty,
                updated_at = now()
            RETURNING id, sku, name, price_cents, stock_qty, created_at, updated_at
            "#,
        )
        .bind(draft.sku())
        .bind(draft.name())
        .bind(draft.price_cents())
        .bind(draft.stock_qty())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_product", e))?;

        let product = ProductRow::from_row(&row)
            .map_err(|e| StoreError::storage("upsert_product", e.to_string()))?;
        Ok(product.into())
    }

    #[instrument(skip(self), err)]
    async fn list_sales(&self, limit: i64) -> StoreResult<Vec<Sale>> {
        let rows = sqlx::query(
            r#"
            SELECT id, total_cents, created_at
            FROM sales
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_sales", e))?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            let sale = SaleRow::from_row(&row)
                .map_err(|e| StoreError::storage("list_sales", e.to_string()))?;
            sales.push(sale.into());
        }
        Ok(sales)
    }

    #[instrument(skip(self, items), fields(item_count = items.len()), err)]
    async fn create_sale(&self, items: &[LineItemRequest]) -> StoreResult<Sale> {
        // Fail fast on structural problems; no transaction is opened.
        let lines = validate_items(items)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_checkout", e))?;

        // Lock and fetch the whole distinct product set in one statement.
        let ids: Vec<i64> = lines.iter().map(|l| l.product_id.as_i64()).collect();
        let rows = sqlx::query(
            r#"
            SELECT id, price_cents, stock_qty
            FROM products
            WHERE id = ANY($1)
            FOR UPDATE
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("lock_and_fetch", e))?;

        let mut snapshots: HashMap<ProductId, StockSnapshot> = HashMap::with_capacity(rows.len());
        for row in rows {
            let snapshot = snapshot_from_row(&row)?;
            snapshots.insert(snapshot.product_id, snapshot);
        }

        // Price every line from the locked snapshots.
        let order = match price_order(&lines, &snapshots) {
            Ok(order) => order,
            Err(err) => {
                // Best-effort rollback: dropping the transaction rolls back
                // anyway, and a rollback fault must not mask the business
                // failure.
                if let Err(e) = tx.rollback().await {
                    tracing::warn!(error = %e, "rollback failed after checkout rejection");
                }
                return Err(err.into());
            }
        };

        let row = sqlx::query(
            r#"
            INSERT INTO sales (total_cents)
            VALUES ($1)
            RETURNING id, total_cents, created_at
            "#,
        )
        .bind(order.total_cents)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_sale", e))?;
        let sale: Sale = SaleRow::from_row(&row)
            .map_err(|e| StoreError::storage("insert_sale", e.to_string()))?
            .into();

        for line in &order.lines {
            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, product_id, quantity, unit_price_cents)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(sale.id.as_i64())
            .bind(line.product_id.as_i64())
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_sale_item", e))?;

            // Guarded decrement: a zero-row update means the decrement would
            // drive stock negative. The pricing check above makes this
            // unreachable, but the `stock_qty >= 0` invariant is enforced
            // here too rather than trusted.
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock_qty = stock_qty - $2, updated_at = now()
                WHERE id = $1 AND stock_qty >= $2
                "#,
            )
            .bind(line.product_id.as_i64())
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("decrement_stock", e))?;

            if result.rows_affected() == 0 {
                let available = snapshots
                    .get(&line.product_id)
                    .map(|s| s.stock_qty)
                    .unwrap_or(0);
                if let Err(e) = tx.rollback().await {
                    tracing::warn!(error = %e, "rollback failed after checkout rejection");
                }
                return Err(CheckoutError::InsufficientStock {
                    product_id: line.product_id,
                    requested: line.quantity,
                    available,
                }
                .into());
            }
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_checkout", e))?;

        tracing::debug!(sale_id = %sale.id, total_cents = sale.total_cents, "sale committed");
        Ok(sale)
    }
}

fn snapshot_from_row(row: &sqlx::postgres::PgRow) -> StoreResult<StockSnapshot> {
    let read = |e: sqlx::Error| StoreError::storage("lock_and_fetch", e.to_string());
    Ok(StockSnapshot {
        product_id: ProductId::from_row(row.try_get("id").map_err(read)?),
        price_cents: row.try_get("price_cents").map_err(read)?,
        stock_qty: row.try_get("stock_qty").map_err(read)?,
    })
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    id: i64,
    sku: String,
    name: String,
    price_cents: i64,
    stock_qty: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for ProductRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            sku: row.try_get("sku")?,
            name: row.try_get("name")?,
            price_cents: row.try_get("price_cents")?,
            stock_qty: row.try_get("stock_qty")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId::from_row(row.id),
            sku: row.sku,
            name: row.name,
            price_cents: row.price_cents,
            stock_qty: row.stock_qty,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
struct SaleRow {
    id: i64,
    total_cents: i64,
    created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for SaleRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(SaleRow {
            id: row.try_get("id")?,
            total_cents: row.try_get("total_cents")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: SaleId::from_row(row.id),
            total_cents: row.total_cents,
            created_at: row.created_at,
        }
    }
}
