//! `tillpoint-inventory` — product catalog domain.
//!
//! Products carry a unique SKU, a price in minor units, and an on-hand stock
//! quantity with the invariant `stock_qty >= 0` after every mutation.

pub mod product;

pub use product::{Product, ProductDraft, StockSnapshot};
