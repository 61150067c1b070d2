//! Cart domain types.

use serde::Serialize;

use driftwear_core::{CartItemId, Price, ProductId};

/// A cart row joined with the product it points at.
///
/// One row per (product, size, color) tuple; adding the same tuple again
/// bumps `quantity` instead of inserting.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartItemDetail {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_slug: String,
    pub quantity: i32,
    pub size: String,
    pub color: String,
    /// Current unit price of the product (not a snapshot).
    pub price: Price,
    pub image_url: Option<String>,
}

impl CartItemDetail {
    /// Price for this line at the current unit price.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity.max(0).unsigned_abs())
    }
}

/// The cart payload: items plus a computed subtotal.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemDetail>,
    pub subtotal: Price,
}

impl CartView {
    /// Assemble a view from joined rows, summing line totals.
    #[must_use]
    pub fn from_items(items: Vec<CartItemDetail>) -> Self {
        let subtotal = items.iter().map(CartItemDetail::line_total).sum();
        Self { items, subtotal }
    }
}
