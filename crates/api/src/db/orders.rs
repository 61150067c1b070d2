//! Order repository for database operations.
//!
//! Order creation happens inside the checkout transaction
//! (`services::checkout`); this repository covers reads, back-office
//! listings and status updates.

use serde::Serialize;
use sqlx::PgPool;

use driftwear_core::{OrderId, OrderStatus, Price, UserId};

use super::RepositoryError;
use crate::models::{Address, AdminOrderDetail, Order, OrderDetail, OrderItem, OrderSummary};

const ORDER_COLUMNS: &str = "id, user_id, status, total, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str = "id, product_id, product_name, quantity, size, color, price";

/// How many orders carry each status, for the dashboard.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Get one of a user's orders with its lines and shipping address.
    ///
    /// Returns `None` when the order doesn't exist or belongs to someone
    /// else; callers can't tell the two apart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn get_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<OrderDetail>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $2 AND user_id = $1"
        ))
        .bind(user_id)
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = self.list_items(order.id).await?;
        let shipping_address = self.get_shipping_address(order.id).await?;

        Ok(Some(OrderDetail {
            order,
            items,
            shipping_address,
        }))
    }

    /// Get any order with its lines, shipping address and customer email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn get_admin_detail(
        &self,
        order_id: OrderId,
    ) -> Result<Option<AdminOrderDetail>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct OrderWithEmailRow {
            #[sqlx(flatten)]
            order: Order,
            user_email: String,
        }

        let row = sqlx::query_as::<_, OrderWithEmailRow>(
            "SELECT o.id, o.user_id, o.status, o.total, o.created_at, o.updated_at, \
                    u.email AS user_email \
             FROM orders o \
             JOIN users u ON u.id = o.user_id \
             WHERE o.id = $1",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.list_items(row.order.id).await?;
        let shipping_address = self.get_shipping_address(row.order.id).await?;

        Ok(Some(AdminOrderDetail {
            order: row.order,
            user_email: row.user_email,
            items,
            shipping_address,
        }))
    }

    /// List all orders for the back office, newest first, optionally
    /// filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderSummary>(
            "SELECT o.id, o.user_id, u.email AS user_email, o.status, o.total, \
                    COUNT(oi.id) AS item_count, o.created_at \
             FROM orders o \
             JOIN users u ON u.id = o.user_id \
             LEFT JOIN order_items oi ON oi.order_id = o.id \
             WHERE ($1::order_status IS NULL OR o.status = $1) \
             GROUP BY o.id, u.email \
             ORDER BY o.created_at DESC, o.id DESC \
             LIMIT $2",
        )
        .bind(status)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Write a new status onto an order. Any status can follow any other;
    /// there is no transition validation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order_id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        order.ok_or(RepositoryError::NotFound)
    }

    /// Count orders grouped by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_status(&self) -> Result<Vec<StatusCount>, RepositoryError> {
        let counts = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM orders GROUP BY status ORDER BY status",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(counts)
    }

    /// Sum the totals of all non-cancelled orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue(&self) -> Result<Price, RepositoryError> {
        let sum = sqlx::query_scalar::<_, Option<rust_decimal::Decimal>>(
            "SELECT SUM(total) FROM orders WHERE status <> 'CANCELLED'",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(Price::new(sum.unwrap_or_default()))
    }

    async fn list_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items \
             WHERE order_id = $1 ORDER BY id ASC"
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    async fn get_shipping_address(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Address>, RepositoryError> {
        let address = sqlx::query_as::<_, Address>(
            "SELECT a.id, a.street, a.apartment, a.city, a.state, a.zip, a.country \
             FROM addresses a \
             JOIN orders o ON o.address_id = a.id \
             WHERE o.id = $1",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(address)
    }
}
