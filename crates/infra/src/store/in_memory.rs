//! In-memory POS store.
//!
//! Used by tests and suitable as the single-process substitute for row
//! locking: one async mutex serializes every checkout, which is the
//! degenerate form of "lock the whole requested product set up front".
//! Mutations are applied only after every line has validated, so failed
//! checkouts leave no trace, same as a rolled-back transaction.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::Mutex;

use tillpoint_core::{ProductId, SaleId};
use tillpoint_inventory::{Product, ProductDraft, StockSnapshot};
use tillpoint_sales::{LineItemRequest, PricedLine, Sale, SaleItem, price_order, validate_items};

use crate::error::StoreResult;
use crate::store::r#trait::PosStore;

#[derive(Debug, Default)]
struct State {
    products: Vec<Product>,
    sales: Vec<Sale>,
    sale_items: Vec<SaleItem>,
    next_product_id: i64,
    next_sale_id: i64,
}

/// In-memory implementation of [`PosStore`].
#[derive(Debug, Default)]
pub struct InMemoryPosStore {
    inner: Mutex<State>,
}

impl InMemoryPosStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items recorded for a sale (test observation point; the HTTP surface
    /// only lists sales).
    pub async fn items_for(&self, sale_id: SaleId) -> Vec<SaleItem> {
        let state = self.inner.lock().await;
        state
            .sale_items
            .iter()
            .filter(|i| i.sale_id == sale_id)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl PosStore for InMemoryPosStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let state = self.inner.lock().await;
        let mut products = state.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn upsert_product(&self, draft: &ProductDraft) -> StoreResult<Product> {
        let mut state = self.inner.lock().await;
        let now = Utc::now();

        if let Some(existing) = state.products.iter_mut().find(|p| p.sku == draft.sku()) {
            existing.name = draft.name().to_string();
            existing.price_cents = draft.price_cents();
            existing.stock_qty = draft.stock_qty();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        state.next_product_id += 1;
        let product = Product {
            id: ProductId::from_row(state.next_product_id),
            sku: draft.sku().to_string(),
            name: draft.name().to_string(),
            price_cents: draft.price_cents(),
            stock_qty: draft.stock_qty(),
            created_at: now,
            updated_at: now,
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn list_sales(&self, limit: i64) -> StoreResult<Vec<Sale>> {
        let state = self.inner.lock().await;
        Ok(state
            .sales
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn create_sale(&self, items: &[LineItemRequest]) -> StoreResult<Sale> {
        let lines = validate_items(items)?;

        // Holding the mutex across validate-and-mutate is the transaction.
        let mut state = self.inner.lock().await;

        let snapshots: HashMap<ProductId, StockSnapshot> = state
            .products
            .iter()
            .map(|p| {
                (p.id, StockSnapshot {
                    product_id: p.id,
                    price_cents: p.price_cents,
                    stock_qty: p.stock_qty,
                })
            })
            .collect();

        let order = price_order(&lines, &snapshots)?;

        // Every line validated; apply the staged mutations.
        let now = Utc::now();
        state.next_sale_id += 1;
        let sale = Sale {
            id: SaleId::from_row(state.next_sale_id),
            total_cents: order.total_cents,
            created_at: now,
        };
        state.sales.push(sale.clone());

        for PricedLine {
            product_id,
            quantity,
            unit_price_cents,
        } in order.lines
        {
            state.sale_items.push(SaleItem {
                sale_id: sale.id,
                product_id,
                quantity,
                unit_price_cents,
            });
            let product = state
                .products
                .iter_mut()
                .find(|p| p.id == product_id)
                .expect("locked snapshot came from this product set");
            product.stock_qty -= quantity;
            product.updated_at = now;
        }

        Ok(sale)
    }
}
