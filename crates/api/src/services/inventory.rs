//! Read-only availability reports for checkout items.
//!
//! Runs the same per-item logic as the checkout transaction (aggregate
//! stock, then the size counter unless the size sentinel, then the color
//! counter unless the color sentinel) without writing anything. The
//! report is advisory: stock can change between this check and the actual
//! checkout, whose conditional decrements are the real guard.

use serde::Serialize;
use sqlx::PgPool;

use driftwear_core::{DEFAULT_COLOR, ONE_SIZE, ProductId};

use super::checkout::CheckoutItem;
use crate::db::RepositoryError;
use crate::db::products::ProductRepository;

/// Why an item can't be fulfilled as requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityIssue {
    ProductNotFound,
    SizeUnavailable,
    ColorUnavailable,
    InsufficientStock,
}

/// Availability report for one requested item.
#[derive(Debug, Serialize)]
pub struct ItemAvailability {
    pub product_id: ProductId,
    /// Requested size, sentinel included.
    pub size: String,
    /// Requested color, sentinel included.
    pub color: String,
    pub available: bool,
    /// Most units fulfillable right now across the touched counters.
    pub available_quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AvailabilityIssue>,
}

/// Produces availability reports against current stock counters.
pub struct InventoryService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> InventoryService<'a> {
    /// Create a new inventory service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// Report availability for a batch of items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any lookup fails.
    pub async fn check_items(
        &self,
        items: &[CheckoutItem],
    ) -> Result<Vec<ItemAvailability>, RepositoryError> {
        let mut reports = Vec::with_capacity(items.len());
        for item in items {
            reports.push(self.check_item(item).await?);
        }
        Ok(reports)
    }

    /// Report availability for a single item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any lookup fails.
    pub async fn check_item(
        &self,
        item: &CheckoutItem,
    ) -> Result<ItemAvailability, RepositoryError> {
        let size = item.effective_size();
        let color = item.effective_color();

        let Some(level) = self.products.get_stock(item.product_id).await? else {
            return Ok(ItemAvailability {
                product_id: item.product_id,
                size: size.to_owned(),
                color: color.to_owned(),
                available: false,
                available_quantity: 0,
                error: Some(AvailabilityIssue::ProductNotFound),
            });
        };

        let size_stock = if size == ONE_SIZE {
            None
        } else {
            Some(self.products.get_size_stock(item.product_id, size).await?)
        };

        let color_stock = if color == DEFAULT_COLOR {
            None
        } else {
            Some(self.products.get_color_stock(item.product_id, color).await?)
        };

        let (available_quantity, error) =
            classify(item.quantity, level.stock, size_stock, color_stock);

        Ok(ItemAvailability {
            product_id: item.product_id,
            size: size.to_owned(),
            color: color.to_owned(),
            available: error.is_none(),
            available_quantity,
            error,
        })
    }
}

/// Walk the counters in checkout order and report the first problem.
///
/// For `size_stock` and `color_stock`, the outer `None` means the
/// sentinel skipped that counter and the inner `None` means the product
/// has no row for the requested value.
fn classify(
    quantity: i32,
    aggregate_stock: i32,
    size_stock: Option<Option<i32>>,
    color_stock: Option<Option<i32>>,
) -> (i32, Option<AvailabilityIssue>) {
    let mut available = aggregate_stock;
    if available < quantity {
        return (available, Some(AvailabilityIssue::InsufficientStock));
    }

    if let Some(row) = size_stock {
        let Some(stock) = row else {
            return (0, Some(AvailabilityIssue::SizeUnavailable));
        };
        available = available.min(stock);
        if available < quantity {
            return (available, Some(AvailabilityIssue::InsufficientStock));
        }
    }

    if let Some(row) = color_stock {
        let Some(stock) = row else {
            return (0, Some(AvailabilityIssue::ColorUnavailable));
        };
        available = available.min(stock);
        if available < quantity {
            return (available, Some(AvailabilityIssue::InsufficientStock));
        }
    }

    (available, None)
}
