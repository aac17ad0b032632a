use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use tillpoint_infra::{DEFAULT_SALES_LIMIT, PosStore};
use tillpoint_sales::LineItemRequest;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(create_sale).get(list_sales))
}

pub async fn list_sales(
    Extension(store): Extension<Arc<dyn PosStore>>,
) -> axum::response::Response {
    match store.list_sales(DEFAULT_SALES_LIMIT).await {
        Ok(sales) => (StatusCode::OK, Json(sales)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_sale(
    Extension(store): Extension<Arc<dyn PosStore>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let items: Vec<LineItemRequest> = dto::sale_items_from_value(&body);

    match store.create_sale(&items).await {
        Ok(sale) => (StatusCode::CREATED, Json(sale)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
