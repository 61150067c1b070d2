//! Database operations for the Driftwear `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Customer and admin accounts (role column)
//! - `categories`, `products`, `product_sizes`, `product_colors`,
//!   `product_variants`, `product_images` - Catalog
//! - `cart_items` - Per-user carts, one row per (product, size, color)
//! - `addresses`, `orders`, `order_items` - Checkout output
//! - `reviews` - Product reviews
//! - `password_reset_tokens` - Single-use reset tokens
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p driftwear-cli -- migrate
//! ```

pub mod cart;
pub mod categories;
pub mod orders;
pub mod password_resets;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::CartRepository;
pub use categories::CategoryRepository;
pub use orders::{OrderRepository, StatusCount};
pub use password_resets::PasswordResetRepository;
pub use products::{NewProduct, ProductChanges, ProductFilter, ProductRepository, VariantChanges};
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email or slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into [`RepositoryError::Conflict`].
    pub(crate) fn from_sqlx(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
