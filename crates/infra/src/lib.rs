//! Infrastructure layer: database config, the store boundary, and its
//! Postgres and in-memory implementations.

pub mod config;
pub mod error;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use config::DatabaseConfig;
pub use error::{StoreError, StoreResult};
pub use store::{DEFAULT_SALES_LIMIT, InMemoryPosStore, PosStore, PostgresPosStore};
