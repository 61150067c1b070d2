//! Wire-format guarantees that clients depend on.
//!
//! These run without a server. They pin the serialized names and shapes
//! that the storefront and back-office clients parse, so a refactor that
//! silently changes one fails here first.

#![allow(clippy::unwrap_used)]

use serde_json::json;

use driftwear_api::services::checkout::CheckoutItem;
use driftwear_core::{DEFAULT_COLOR, ONE_SIZE, OrderStatus, Price, ProductId, UserRole};

// =============================================================================
// Enum Wire Names
// =============================================================================

#[test]
fn test_order_status_wire_names() {
    let expected = [
        (OrderStatus::Pending, "PENDING"),
        (OrderStatus::Paid, "PAID"),
        (OrderStatus::Shipped, "SHIPPED"),
        (OrderStatus::Delivered, "DELIVERED"),
        (OrderStatus::Cancelled, "CANCELLED"),
    ];

    for (status, name) in expected {
        assert_eq!(serde_json::to_value(status).unwrap(), json!(name));
        let parsed: OrderStatus = serde_json::from_value(json!(name)).unwrap();
        assert_eq!(parsed, status);
    }

    // Lowercase is not accepted; clients must send the canonical form
    assert!(serde_json::from_value::<OrderStatus>(json!("pending")).is_err());
}

#[test]
fn test_user_role_wire_names() {
    assert_eq!(serde_json::to_value(UserRole::Customer).unwrap(), json!("CUSTOMER"));
    assert_eq!(serde_json::to_value(UserRole::Admin).unwrap(), json!("ADMIN"));
    assert!(UserRole::Admin.is_admin());
    assert!(!UserRole::Customer.is_admin());
}

// =============================================================================
// Money and Id Shapes
// =============================================================================

#[test]
fn test_price_travels_as_decimal_string() {
    let price = Price::parse("19.99").unwrap();
    assert_eq!(serde_json::to_string(&price).unwrap(), "\"19.99\"");

    // Clients may send bare numbers; both normalize to the same value
    let from_number: Price = serde_json::from_str("19.99").unwrap();
    let from_string: Price = serde_json::from_str("\"19.99\"").unwrap();
    assert_eq!(from_number, from_string);
}

#[test]
fn test_ids_serialize_transparently() {
    let id = ProductId::new(7);
    assert_eq!(serde_json::to_string(&id).unwrap(), "7");

    let parsed: ProductId = serde_json::from_str("7").unwrap();
    assert_eq!(parsed, id);
}

// =============================================================================
// Checkout Item Normalization
// =============================================================================

#[test]
fn test_checkout_item_collapses_blank_choices() {
    let item: CheckoutItem = serde_json::from_value(json!({
        "product_id": 1,
        "quantity": 2,
        "size": "   ",
        "color": null,
    }))
    .unwrap();

    assert_eq!(item.effective_size(), ONE_SIZE);
    assert_eq!(item.effective_color(), DEFAULT_COLOR);
}

#[test]
fn test_checkout_item_keeps_explicit_choices() {
    let item: CheckoutItem = serde_json::from_value(json!({
        "product_id": 1,
        "quantity": 2,
        "size": " M ",
        "color": "Kelp",
    }))
    .unwrap();

    assert_eq!(item.effective_size(), "M");
    assert_eq!(item.effective_color(), "Kelp");
}

#[test]
fn test_checkout_item_fields_are_optional() {
    let item: CheckoutItem =
        serde_json::from_value(json!({"product_id": 1, "quantity": 1})).unwrap();
    assert_eq!(item.effective_size(), ONE_SIZE);
    assert_eq!(item.effective_color(), DEFAULT_COLOR);
}
