use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tillpoint_core::{ProductId, SaleId};

/// Entity: a committed sale.
///
/// Created exactly once, atomically with its items and the matching stock
/// decrements. Immutable afterwards; `total_cents` always equals the sum of
/// `quantity * unit_price_cents` over the sale's items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    /// Total in smallest currency unit (cents); never negative.
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Entity: one line of a sale, identified by `(sale_id, product_id)`.
///
/// `unit_price_cents` is the product's price as observed under the checkout
/// row lock, deliberately decoupled from later price changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price_cents: i64,
}
