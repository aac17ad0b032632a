use std::sync::Arc;

use tillpoint_infra::{DatabaseConfig, PosStore, PostgresPosStore};

#[tokio::main]
async fn main() {
    tillpoint_observability::init();

    let config = DatabaseConfig::from_env();
    let pool = config.connect().await.expect("failed to connect to Postgres");

    let store: Arc<dyn PosStore> = Arc::new(PostgresPosStore::new(pool.clone()));
    let app = tillpoint_api::app::build_app(store);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap_or_else(|e| panic!("failed to bind 0.0.0.0:{port}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    // Drain the pool after the listener stops accepting work.
    tracing::info!("shutting down; draining connection pool");
    pool.close().await;
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
