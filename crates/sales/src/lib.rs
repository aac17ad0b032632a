//! `tillpoint-sales` — sale ledger domain and the pure half of checkout.
//!
//! The sale-creation transaction splits into a pure phase (validate the
//! request, price it against locked stock snapshots) and an effectful phase
//! (persist rows, decrement stock) owned by the storage layer. This crate is
//! the pure phase, so every pricing rule is testable without a database.

pub mod checkout;
pub mod sale;

pub use checkout::{
    CheckoutError, LineItemRequest, PricedLine, PricedOrder, SaleLine, price_order,
    validate_items,
};
pub use sale::{Sale, SaleItem};
