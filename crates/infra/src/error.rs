//! Store error model and SQLx error mapping.

use thiserror::Error;

use tillpoint_sales::CheckoutError;

/// Result type used across the storage layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by a store implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A business-rule failure on the sale path; aborts the transaction.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Connectivity or unexpected database failure. Never retried here;
    /// retry, if any, is the caller's responsibility.
    #[error("storage fault in {operation}: {message}")]
    Storage { operation: String, message: String },
}

impl StoreError {
    pub fn storage(operation: &str, message: impl Into<String>) -> Self {
        Self::Storage {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

/// Map SQLx errors to `StoreError::Storage`.
///
/// Business-rule failures are caught by the engine before they can trip a
/// database constraint, so everything arriving here is treated as a storage
/// fault. The PG error code, when present, is kept in the message.
pub fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.to_string()).unwrap_or_default();
            StoreError::storage(
                operation,
                format!("database error ({}): {}", code, db_err.message()),
            )
        }
        sqlx::Error::PoolClosed => StoreError::storage(operation, "connection pool closed"),
        sqlx::Error::PoolTimedOut => {
            StoreError::storage(operation, "timed out acquiring a connection")
        }
        other => StoreError::storage(operation, other.to_string()),
    }
}
