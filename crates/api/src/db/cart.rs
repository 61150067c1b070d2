//! Cart repository for database operations.
//!
//! Cart rows are keyed by the (user, product, size, color) tuple; products
//! without size or color options use the `"One Size"` / `"Default"`
//! sentinels so the unique constraint holds.

use sqlx::PgPool;

use driftwear_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::CartItemDetail;

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's cart rows joined with current product data, oldest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartItemDetail>, RepositoryError> {
        let items = sqlx::query_as::<_, CartItemDetail>(
            "SELECT ci.id, ci.product_id, p.name AS product_name, p.slug AS product_slug, \
                    ci.quantity, ci.size, ci.color, p.price, \
                    (SELECT pi.url FROM product_images pi \
                     WHERE pi.product_id = p.id \
                     ORDER BY pi.position ASC, pi.id ASC LIMIT 1) AS image_url \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             WHERE ci.user_id = $1 \
             ORDER BY ci.created_at ASC, ci.id ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Add a product to a user's cart, merging with an existing row for the
    /// same (product, size, color) tuple by summing quantities.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
        size: &str,
        color: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_items (user_id, product_id, quantity, size, color) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, product_id, size, color) \
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, \
                           updated_at = now()",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(size)
        .bind(color)
        .execute(self.pool)
        .await
        .map_err(|e| match e {
            // FK failure here means the product vanished, not a bad write.
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                RepositoryError::NotFound
            }
            other => RepositoryError::Database(other),
        })?;

        Ok(())
    }

    /// Set the quantity of one of the user's cart rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the row doesn't exist or
    /// belongs to someone else.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $3, updated_at = now() \
             WHERE id = $2 AND user_id = $1",
        )
        .bind(user_id)
        .bind(item_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove one of the user's cart rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the row doesn't exist or
    /// belongs to someone else.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $2 AND user_id = $1")
            .bind(user_id)
            .bind(item_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove all of a user's cart rows, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
