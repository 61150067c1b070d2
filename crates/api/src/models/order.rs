//! Order and address domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use driftwear_core::{AddressId, OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

/// A shipping address captured at checkout.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// An order row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    /// Server-computed total, snapshotted at checkout.
    pub total: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line on an order.
///
/// `product_name` and `price` are snapshots from checkout time; `product_id`
/// goes null if the product is later deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: i32,
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: Price,
}

/// Full order payload: the order, its lines, and the shipping address.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub shipping_address: Option<Address>,
}

/// An order as the back office sees it: the detail payload plus the
/// customer's email.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub user_email: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: Option<Address>,
}

/// Order row for back-office lists: joined with the customer's email and
/// the number of lines.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderSummary {
    pub id: OrderId,
    pub user_id: UserId,
    pub user_email: String,
    pub status: OrderStatus,
    pub total: Price,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}
