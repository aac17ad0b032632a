use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use tillpoint_infra::PosStore;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(create_product).get(list_products))
}

pub async fn list_products(
    Extension(store): Extension<Arc<dyn PosStore>>,
) -> axum::response::Response {
    match store.list_products().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(store): Extension<Arc<dyn PosStore>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let draft = match dto::product_draft_from_value(&body) {
        Ok(draft) => draft,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match store.upsert_product(&draft).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
