//! Pure checkout logic: request validation and snapshot pricing.
//!
//! Both store implementations drive the same sequence:
//! validate (`validate_items`, before any transaction) → lock the distinct
//! product set → price (`price_order`) → persist. Failures are
//! first-failure-wins in request order; nothing here has side effects.

use std::collections::HashMap;

use thiserror::Error;

use tillpoint_core::ProductId;
use tillpoint_inventory::StockSnapshot;

/// One requested line as parsed from the transport, not yet validated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LineItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// A validated line: positive product id, strictly positive quantity.
///
/// Lines for the same product are coalesced during validation (quantities
/// summed, first occurrence keeps its position) because `(sale_id,
/// product_id)` is the composite identity of a sale item.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SaleLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// A line priced from its locked snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

/// A fully priced order, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub total_cents: i64,
    pub lines: Vec<PricedLine>,
}

/// Failures on the sale-creation path.
///
/// All of these abort the whole transaction and surface as 400-class
/// responses; none are retried by the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// The request carried no line items.
    #[error("No sale items provided")]
    EmptyOrder,

    /// A line item had a non-positive product id or quantity, or amounts
    /// that overflow `i64` when coalesced or priced.
    #[error("Invalid item format")]
    MalformedItem { index: usize },

    /// A requested product does not exist.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// A requested quantity exceeds the locked stock level.
    #[error("Insufficient stock for product {product_id}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },
}

/// Validate raw line items before any transaction is opened (fail fast).
///
/// Rejects empty requests and non-positive ids/quantities, then coalesces
/// duplicate product ids.
pub fn validate_items(items: &[LineItemRequest]) -> Result<Vec<SaleLine>, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyOrder);
    }

    let mut lines: Vec<SaleLine> = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let product_id = ProductId::new(item.product_id)
            .map_err(|_| CheckoutError::MalformedItem { index })?;
        if item.quantity <= 0 {
            return Err(CheckoutError::MalformedItem { index });
        }

        match lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or(CheckoutError::MalformedItem { index })?;
            }
            None => lines.push(SaleLine {
                product_id,
                quantity: item.quantity,
            }),
        }
    }

    Ok(lines)
}

/// Price validated lines against the snapshots taken under the row lock.
///
/// Evaluation is request order, first failure wins: a missing snapshot fails
/// the order with `ProductNotFound`, a short stock level with
/// `InsufficientStock`, a total that overflows `i64` with `MalformedItem`.
/// On success every line carries its snapshot price and the total is their
/// exact sum.
pub fn price_order(
    lines: &[SaleLine],
    snapshots: &HashMap<ProductId, StockSnapshot>,
) -> Result<PricedOrder, CheckoutError> {
    let mut total_cents: i64 = 0;
    let mut priced = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        let snapshot = snapshots
            .get(&line.product_id)
            .ok_or(CheckoutError::ProductNotFound(line.product_id))?;

        if snapshot.stock_qty < line.quantity {
            return Err(CheckoutError::InsufficientStock {
                product_id: line.product_id,
                requested: line.quantity,
                available: snapshot.stock_qty,
            });
        }

        total_cents = line
            .quantity
            .checked_mul(snapshot.price_cents)
            .and_then(|line_total| total_cents.checked_add(line_total))
            .ok_or(CheckoutError::MalformedItem { index })?;
        priced.push(PricedLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price_cents: snapshot.price_cents,
        });
    }

    Ok(PricedOrder {
        total_cents,
        lines: priced,
    })
}
