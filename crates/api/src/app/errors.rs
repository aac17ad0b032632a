use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use tillpoint_infra::StoreError;

/// Map a store failure to its HTTP response.
///
/// Business-rule and validation failures carry their human-readable reason;
/// storage faults are logged and converted to a generic 500 without leaking
/// internal detail.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Checkout(e) => json_error(StatusCode::BAD_REQUEST, e.to_string()),
        StoreError::Storage { .. } => {
            tracing::error!(error = %err, "storage fault");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}
