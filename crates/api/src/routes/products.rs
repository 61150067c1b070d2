//! Public product catalog handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::{ProductFilter, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::{ProductDetail, ProductSummary};
use crate::state::AppState;

/// Default page size when the client doesn't ask for one.
pub const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on `limit` so a single request can't drag the whole table.
pub const MAX_LIMIT: i64 = 200;

/// Clamp a client-supplied limit into `1..=MAX_LIMIT`.
#[must_use]
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Category slug filter.
    pub category: Option<String>,
    /// Featured flag filter.
    pub featured: Option<bool>,
    /// Substring match against name or description.
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// List products, newest first.
///
/// GET /api/products?category=&featured=&q=&limit=
///
/// # Errors
///
/// Returns an error if the database query fails.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<ProductSummary>>> {
    let filter = ProductFilter {
        category_slug: query.category,
        featured: query.featured,
        search: query.q,
    };
    let products = ProductRepository::new(state.pool())
        .list(&filter, clamp_limit(query.limit), 0)
        .await?;

    Ok(Json(products))
}

/// Fetch one product with its category, sizes, colors, variants, images,
/// and reviews.
///
/// GET /api/products/{slug}
///
/// # Errors
///
/// Returns 404 if no product has that slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let detail = ProductRepository::new(state.pool())
        .get_detail_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product '{slug}' not found")))?;

    Ok(Json(detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit_default() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
    }

    #[test]
    fn test_clamp_limit_caps_large_values() {
        assert_eq!(clamp_limit(Some(10_000)), MAX_LIMIT);
    }

    #[test]
    fn test_clamp_limit_floors_non_positive() {
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-5)), 1);
    }

    #[test]
    fn test_clamp_limit_passes_reasonable_values() {
        assert_eq!(clamp_limit(Some(25)), 25);
    }
}
