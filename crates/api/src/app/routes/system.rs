use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::app::errors;

pub async fn health() -> axum::response::Response {
    (StatusCode::OK, axum::Json(serde_json::json!({ "ok": true }))).into_response()
}

pub async fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "Not Found")
}
