//! The store boundary: inventory, sale ledger, and the checkout transaction.

use async_trait::async_trait;

use tillpoint_inventory::{Product, ProductDraft};
use tillpoint_sales::{LineItemRequest, Sale};

use crate::error::StoreResult;

/// Upper bound applied by the recent-sales listing.
pub const DEFAULT_SALES_LIMIT: i64 = 50;

/// Storage operations of the POS core.
///
/// `create_sale` is the only mutation of stock and the only writer of sales:
/// it validates the request, locks the requested product rows, prices every
/// line from the locked snapshots, and persists the sale, its items, and the
/// stock decrements as one atomically-visible unit. The listing operations
/// are plain reads and never participate in that lock.
#[async_trait]
pub trait PosStore: Send + Sync {
    /// All products, ordered by name.
    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    /// Insert a product, or replace name/price/stock of the row with the
    /// same SKU (refreshing `updated_at`). Returns the resulting row.
    async fn upsert_product(&self, draft: &ProductDraft) -> StoreResult<Product>;

    /// Most recent sales, newest id first, at most `limit` rows.
    async fn list_sales(&self, limit: i64) -> StoreResult<Vec<Sale>>;

    /// Run the sale-creation transaction; returns the committed sale.
    ///
    /// Any failure leaves no sale row, no sale items, and no stock change
    /// visible to other callers.
    async fn create_sale(&self, items: &[LineItemRequest]) -> StoreResult<Sale>;
}
