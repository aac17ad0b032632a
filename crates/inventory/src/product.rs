use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tillpoint_core::{DomainError, DomainResult, ProductId};

/// Entity: a product row in the catalog.
///
/// Upserted by SKU, never hard-deleted. `updated_at` is refreshed on every
/// mutation, including stock decrements during checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    /// Price in smallest currency unit (cents); never negative.
    pub price_cents: i64,
    /// On-hand quantity; never negative.
    pub stock_qty: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a product upsert.
///
/// Construction is the validation boundary: a `ProductDraft` that exists is
/// well-formed, so storage code can bind its fields without re-checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    sku: String,
    name: String,
    price_cents: i64,
    stock_qty: i64,
}

impl ProductDraft {
    /// Validate and normalize upsert input.
    ///
    /// SKU and name are trimmed and must be non-empty; price and stock must
    /// be non-negative.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        price_cents: i64,
        stock_qty: i64,
    ) -> DomainResult<Self> {
        let sku = sku.into().trim().to_string();
        let name = name.into().trim().to_string();

        if sku.is_empty() || name.is_empty() {
            return Err(DomainError::validation("Missing sku or name"));
        }
        if price_cents < 0 {
            return Err(DomainError::validation("Invalid price_cents"));
        }
        if stock_qty < 0 {
            return Err(DomainError::validation("Invalid stock_qty"));
        }

        Ok(Self {
            sku,
            name,
            price_cents,
            stock_qty,
        })
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    pub fn stock_qty(&self) -> i64 {
        self.stock_qty
    }
}

/// Price and availability of one product as observed under a row lock.
///
/// Checkout prices every line from the snapshot taken at lock time, so a
/// price change committed after the lock is acquired cannot leak into the
/// sale's total or its recorded unit prices.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StockSnapshot {
    pub product_id: ProductId,
    pub price_cents: i64,
    pub stock_qty: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_trims_sku_and_name() {
        let draft = ProductDraft::new("  SKU-001  ", " Coffee ", 300, 100).unwrap();
        assert_eq!(draft.sku(), "SKU-001");
        assert_eq!(draft.name(), "Coffee");
    }

    #[test]
    fn draft_rejects_blank_sku_or_name() {
        let err = ProductDraft::new("   ", "Coffee", 300, 0).unwrap_err();
        assert_eq!(err, DomainError::validation("Missing sku or name"));

        let err = ProductDraft::new("SKU-001", "", 300, 0).unwrap_err();
        assert_eq!(err, DomainError::validation("Missing sku or name"));
    }

    #[test]
    fn draft_rejects_negative_price() {
        let err = ProductDraft::new("SKU-001", "Coffee", -1, 0).unwrap_err();
        assert_eq!(err, DomainError::validation("Invalid price_cents"));
    }

    #[test]
    fn draft_rejects_negative_stock() {
        let err = ProductDraft::new("SKU-001", "Coffee", 300, -5).unwrap_err();
        assert_eq!(err, DomainError::validation("Invalid stock_qty"));
    }

    #[test]
    fn draft_accepts_zero_price_and_stock() {
        let draft = ProductDraft::new("SKU-FREE", "Sample", 0, 0).unwrap();
        assert_eq!(draft.price_cents(), 0);
        assert_eq!(draft.stock_qty(), 0);
    }
}
