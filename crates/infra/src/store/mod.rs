//! Storage boundary for the POS core.
//!
//! This module defines the store abstraction the HTTP layer talks to, plus a
//! Postgres implementation for deployments and an in-memory implementation
//! for tests and single-process use.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryPosStore;
pub use postgres::PostgresPosStore;
pub use r#trait::{DEFAULT_SALES_LIMIT, PosStore};
