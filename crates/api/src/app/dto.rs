//! Tolerant request-body parsing.
//!
//! Handlers take `Json<Value>` and map fields here rather than deriving
//! `Deserialize` DTOs: a wrong-typed or missing field must surface as the
//! domain's 400 message ("Invalid item format", "Invalid price_cents", ...)
//! and never as the extractor's generic 422 rejection. Absent or
//! non-conforming values map to sentinels the domain validation rejects
//! with the right message.

use serde_json::Value;

use tillpoint_core::DomainResult;
use tillpoint_inventory::ProductDraft;
use tillpoint_sales::LineItemRequest;

/// Parse the body of `POST /api/products` into a validated draft.
///
/// Non-string `sku`/`name` read as missing; a non-integer `price_cents` or
/// `stock_qty` reads as negative. An absent `stock_qty` defaults to zero.
pub fn product_draft_from_value(body: &Value) -> DomainResult<ProductDraft> {
    let text = |key: &str| body.get(key).and_then(Value::as_str).unwrap_or_default();
    let price_cents = body.get("price_cents").and_then(Value::as_i64).unwrap_or(-1);
    let stock_qty = match body.get("stock_qty") {
        None | Some(Value::Null) => 0,
        Some(value) => value.as_i64().unwrap_or(-1),
    };
    ProductDraft::new(text("sku"), text("name"), price_cents, stock_qty)
}

/// Parse the body of `POST /api/sales` into raw line items.
///
/// A missing or non-array `items` reads as an empty order. Within a line,
/// a missing or non-integer `productId`/`quantity` maps to zero, which item
/// validation rejects as malformed at that line's index.
pub fn sale_items_from_value(body: &Value) -> Vec<LineItemRequest> {
    let Some(items) = body.get("items").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| LineItemRequest {
            product_id: item.get("productId").and_then(Value::as_i64).unwrap_or(0),
            quantity: item.get("quantity").and_then(Value::as_i64).unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_integer_item_fields_map_to_rejected_sentinels() {
        let items = sale_items_from_value(&json!({
            "items": [
                {"productId": "abc", "quantity": 1},
                {"productId": 2, "quantity": 1.5},
                {"quantity": 3},
            ]
        }));
        assert_eq!(items[0], LineItemRequest { product_id: 0, quantity: 1 });
        assert_eq!(items[1], LineItemRequest { product_id: 2, quantity: 0 });
        assert_eq!(items[2], LineItemRequest { product_id: 0, quantity: 3 });
    }

    #[test]
    fn missing_or_non_array_items_read_as_an_empty_order() {
        assert!(sale_items_from_value(&json!({})).is_empty());
        assert!(sale_items_from_value(&json!({"items": "nope"})).is_empty());
        assert!(sale_items_from_value(&json!([1, 2])).is_empty());
    }

    #[test]
    fn wrong_typed_product_fields_fail_with_the_field_message() {
        let err = product_draft_from_value(&json!({"sku": 7, "name": "Coffee", "price_cents": 300}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing sku or name");

        let err = product_draft_from_value(
            &json!({"sku": "SKU-001", "name": "Coffee", "price_cents": "free"}),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid price_cents");

        let err = product_draft_from_value(
            &json!({"sku": "SKU-001", "name": "Coffee", "price_cents": 300, "stock_qty": 1.5}),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid stock_qty");
    }

    #[test]
    fn absent_stock_qty_defaults_to_zero() {
        let draft =
            product_draft_from_value(&json!({"sku": "SKU-001", "name": "Coffee", "price_cents": 300}))
                .unwrap();
        assert_eq!(draft.stock_qty(), 0);
    }
}
