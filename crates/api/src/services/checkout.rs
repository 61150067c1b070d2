//! The checkout transaction.
//!
//! Everything happens inside one database transaction: the shipping
//! address, the order and its lines, the stock decrements and the cart
//! wipe commit together or not at all. Stock decrements are conditional
//! updates (`... AND stock >= quantity`), so of two checkouts racing for
//! the last unit exactly one commits and the other aborts with a stock
//! error.
//!
//! There is no idempotency key: submitting the same request twice creates
//! two orders and decrements stock twice.

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use driftwear_core::{AddressId, DEFAULT_COLOR, ONE_SIZE, OrderId, Price, ProductId, UserId};

use crate::db::RepositoryError;
use crate::models::Order;

/// One line of a checkout request. Also the input shape for the
/// availability report in [`super::inventory`].
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CheckoutItem {
    /// The size this line asks for, with blank input collapsing to the
    /// sentinel.
    #[must_use]
    pub fn effective_size(&self) -> &str {
        self.size
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(ONE_SIZE)
    }

    /// The color this line asks for, with blank input collapsing to the
    /// sentinel.
    #[must_use]
    pub fn effective_color(&self) -> &str {
        self.color
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_COLOR)
    }
}

/// Shipping address fields for a checkout request.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingAddressInput {
    pub street: String,
    #[serde(default)]
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// A checkout request body.
///
/// `total` is optional; when present it must match the server-side
/// recomputation exactly. The server never trusts it as the amount to
/// charge.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    pub shipping_address: ShippingAddressInput,
    #[serde(default)]
    pub total: Option<Price>,
}

impl CheckoutRequest {
    /// Field-level validation, run before the transaction starts.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Validation` naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.items.is_empty() {
            return Err(CheckoutError::Validation("items must not be empty".into()));
        }

        for item in &self.items {
            if item.quantity < 1 {
                return Err(CheckoutError::Validation(format!(
                    "quantity must be at least 1 for product {}",
                    item.product_id
                )));
            }
        }

        let address = &self.shipping_address;
        for (value, field) in [
            (&address.street, "street"),
            (&address.city, "city"),
            (&address.state, "state"),
            (&address.zip, "zip"),
            (&address.country, "country"),
        ] {
            if value.trim().is_empty() {
                return Err(CheckoutError::Validation(format!(
                    "shipping_address.{field} must not be empty"
                )));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Request failed field validation; nothing was written.
    #[error("{0}")]
    Validation(String),

    /// Client-declared total doesn't match the server-side recomputation.
    #[error("declared total {declared} does not match computed total {computed}")]
    TotalMismatch { declared: Price, computed: Price },

    /// A product was missing or a stock counter was short. The whole
    /// transaction rolled back.
    #[error("STOCK_ERROR: {0}")]
    Stock(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(sqlx::FromRow)]
struct CheckoutProduct {
    name: String,
    price: Price,
}

/// Runs checkout requests against the database.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Execute a checkout for a user and return the committed order.
    ///
    /// Sequence inside one transaction: insert the shipping address, load
    /// and price every item, verify the declared total if present, insert
    /// the order as `PENDING`, insert the lines while decrementing every
    /// touched counter conditionally, clear the cart, flip the order to
    /// `PAID`, commit. Any early return drops the transaction, which rolls
    /// everything back.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Validation` / `TotalMismatch` before any
    /// durable write, `CheckoutError::Stock` when an item can't be
    /// fulfilled, and `Repository`/`Database` for unexpected failures.
    pub async fn checkout(
        &self,
        user_id: UserId,
        request: &CheckoutRequest,
    ) -> Result<Order, CheckoutError> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        let address = &request.shipping_address;
        let address_id = sqlx::query_scalar::<_, AddressId>(
            "INSERT INTO addresses (user_id, street, apartment, city, state, zip, country) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id",
        )
        .bind(user_id)
        .bind(address.street.trim())
        .bind(address.apartment.as_deref().map(str::trim))
        .bind(address.city.trim())
        .bind(address.state.trim())
        .bind(address.zip.trim())
        .bind(address.country.trim())
        .fetch_one(&mut *tx)
        .await?;

        // Price every line from the persisted product rows.
        let mut lines = Vec::with_capacity(request.items.len());
        let mut computed = Price::ZERO;
        for item in &request.items {
            let product = sqlx::query_as::<_, CheckoutProduct>(
                "SELECT name, price FROM products WHERE id = $1",
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                CheckoutError::Stock(format!("product {} not found", item.product_id))
            })?;

            computed = computed + product.price.times(item.quantity.unsigned_abs());
            lines.push((item, product));
        }

        if let Some(declared) = request.total
            && declared != computed
        {
            return Err(CheckoutError::TotalMismatch { declared, computed });
        }

        let order_id = sqlx::query_scalar::<_, OrderId>(
            "INSERT INTO orders (user_id, address_id, status, total) \
             VALUES ($1, $2, 'PENDING', $3) \
             RETURNING id",
        )
        .bind(user_id)
        .bind(address_id)
        .bind(computed)
        .fetch_one(&mut *tx)
        .await?;

        for (item, product) in &lines {
            let size = item.effective_size();
            let color = item.effective_color();

            sqlx::query(
                "INSERT INTO order_items \
                 (order_id, product_id, product_name, quantity, size, color, price) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(&product.name)
            .bind(item.quantity)
            .bind((size != ONE_SIZE).then_some(size))
            .bind((color != DEFAULT_COLOR).then_some(color))
            .bind(product.price)
            .execute(&mut *tx)
            .await?;

            let decremented = sqlx::query(
                "UPDATE products SET stock = stock - $2, updated_at = now() \
                 WHERE id = $1 AND stock >= $2",
            )
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
            if decremented.rows_affected() == 0 {
                return Err(CheckoutError::Stock(format!(
                    "insufficient stock for {}",
                    product.name
                )));
            }

            if size != ONE_SIZE {
                let decremented = sqlx::query(
                    "UPDATE product_sizes SET stock = stock - $3 \
                     WHERE product_id = $1 AND size = $2 AND stock >= $3",
                )
                .bind(item.product_id)
                .bind(size)
                .bind(item.quantity)
                .execute(&mut *tx)
                .await?;
                if decremented.rows_affected() == 0 {
                    return Err(CheckoutError::Stock(format!(
                        "size {size} unavailable for {}",
                        product.name
                    )));
                }
            }

            if color != DEFAULT_COLOR {
                let decremented = sqlx::query(
                    "UPDATE product_colors SET stock = stock - $3 \
                     WHERE product_id = $1 AND color = $2 AND stock >= $3",
                )
                .bind(item.product_id)
                .bind(color)
                .bind(item.quantity)
                .execute(&mut *tx)
                .await?;
                if decremented.rows_affected() == 0 {
                    return Err(CheckoutError::Stock(format!(
                        "color {color} unavailable for {}",
                        product.name
                    )));
                }
            }
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        // The PAID flip commits atomically with the decrements; no
        // PENDING order with spent stock is ever visible outside.
        let order = sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = 'PAID', updated_at = now() \
             WHERE id = $1 \
             RETURNING id, user_id, status, total, created_at, updated_at",
        )
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(items: Vec<CheckoutItem>) -> CheckoutRequest {
        CheckoutRequest {
            items,
            shipping_address: ShippingAddressInput {
                street: "1 Harbor Way".into(),
                apartment: None,
                city: "Portland".into(),
                state: "OR".into(),
                zip: "97201".into(),
                country: "US".into(),
            },
            total: None,
        }
    }

    fn item(quantity: i32) -> CheckoutItem {
        CheckoutItem {
            product_id: ProductId::from(1),
            quantity,
            size: None,
            color: None,
        }
    }

    #[test]
    fn test_validate_rejects_empty_items() {
        let err = request(vec![]).validate().unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let err = request(vec![item(0)]).validate().unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_blank_address_field() {
        let mut req = request(vec![item(1)]);
        req.shipping_address.city = "   ".into();

        let err = req.validate().unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        assert!(request(vec![item(2)]).validate().is_ok());
    }

    #[test]
    fn test_effective_size_defaults_to_sentinel() {
        let mut line = item(1);
        assert_eq!(line.effective_size(), ONE_SIZE);

        line.size = Some("  ".into());
        assert_eq!(line.effective_size(), ONE_SIZE);

        line.size = Some(" M ".into());
        assert_eq!(line.effective_size(), "M");
    }

    #[test]
    fn test_effective_color_defaults_to_sentinel() {
        let mut line = item(1);
        assert_eq!(line.effective_color(), DEFAULT_COLOR);

        line.color = Some("Black".into());
        assert_eq!(line.effective_color(), "Black");
    }

    #[test]
    fn test_request_deserializes_string_or_number_total() {
        let body = serde_json::json!({
            "items": [{"product_id": 1, "quantity": 2, "size": "M"}],
            "shipping_address": {
                "street": "1 Harbor Way", "city": "Portland",
                "state": "OR", "zip": "97201", "country": "US"
            },
            "total": "59.98"
        });
        let req: CheckoutRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.total.unwrap().to_string(), "59.98");

        let body = serde_json::json!({
            "items": [{"product_id": 1, "quantity": 2}],
            "shipping_address": {
                "street": "1 Harbor Way", "city": "Portland",
                "state": "OR", "zip": "97201", "country": "US"
            },
            "total": 59.98
        });
        let req: CheckoutRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.total.unwrap().to_string(), "59.98");
    }
}
