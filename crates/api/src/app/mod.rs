//! HTTP API application wiring (Axum router + store wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: tolerant request-body parsing
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use tillpoint_infra::PosStore;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router over any store implementation (public
/// entrypoint used by `main.rs` and the black-box tests).
pub fn build_app(store: Arc<dyn PosStore>) -> Router {
    let api = Router::new()
        .route("/health", get(routes::system::health))
        .nest("/products", routes::products::router())
        .nest("/sales", routes::sales::router());

    Router::new()
        .nest("/api", api)
        .fallback(routes::system::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_id))
                .layer(Extension(store)),
        )
}
