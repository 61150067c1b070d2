//! Cart handlers for the authenticated user.
//!
//! Every mutation responds with the refreshed cart view so clients don't
//! need a follow-up GET.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use driftwear_core::{CartItemId, DEFAULT_COLOR, ONE_SIZE, ProductId};

use crate::db::{CartRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::CartView;
use crate::state::AppState;

/// Request to add a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
    /// Size label; absent or blank falls back to the `"One Size"` sentinel.
    #[serde(default)]
    pub size: Option<String>,
    /// Color label; absent or blank falls back to the `"Default"` sentinel.
    #[serde(default)]
    pub color: Option<String>,
}

/// Request to set a cart row's quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub item_id: CartItemId,
    pub quantity: i32,
}

/// Query for removing cart rows.
#[derive(Debug, Default, Deserialize)]
pub struct RemoveQuery {
    /// Row to remove; when absent the whole cart is cleared.
    pub item_id: Option<CartItemId>,
}

/// Fetch the current user's cart.
///
/// GET /api/cart
///
/// # Errors
///
/// Returns an error if the database query fails.
#[instrument(skip(user, state))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<CartView>> {
    let items = CartRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(CartView::from_items(items)))
}

/// Add a product to the cart, merging with an existing row for the same
/// (product, size, color) tuple.
///
/// POST /api/cart
///
/// # Errors
///
/// Returns 400 for a non-positive quantity and 404 when the product
/// doesn't exist.
#[instrument(skip(user, state))]
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_owned(),
        ));
    }

    let size = normalize(body.size.as_deref(), ONE_SIZE);
    let color = normalize(body.color.as_deref(), DEFAULT_COLOR);

    let repo = CartRepository::new(state.pool());
    repo.add_item(user.id, body.product_id, body.quantity, size, color)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_owned()),
            other => other.into(),
        })?;

    let items = repo.list_for_user(user.id).await?;
    Ok(Json(CartView::from_items(items)))
}

/// Set the quantity of one cart row.
///
/// PUT /api/cart
///
/// # Errors
///
/// Returns 400 for a non-positive quantity and 404 when the row doesn't
/// exist or belongs to another user.
#[instrument(skip(user, state))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<CartView>> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_owned(),
        ));
    }

    let repo = CartRepository::new(state.pool());
    repo.update_quantity(user.id, body.item_id, body.quantity)
        .await?;

    let items = repo.list_for_user(user.id).await?;
    Ok(Json(CartView::from_items(items)))
}

/// Remove one cart row, or clear the cart when no `item_id` is given.
///
/// DELETE /api/cart?item_id=
///
/// # Errors
///
/// Returns 404 when a named row doesn't exist or belongs to another user.
#[instrument(skip(user, state))]
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<RemoveQuery>,
) -> Result<Json<CartView>> {
    let repo = CartRepository::new(state.pool());
    match query.item_id {
        Some(item_id) => repo.remove_item(user.id, item_id).await?,
        None => {
            repo.clear(user.id).await?;
        }
    }

    let items = repo.list_for_user(user.id).await?;
    Ok(Json(CartView::from_items(items)))
}

/// Trimmed label, or the sentinel when absent or blank.
fn normalize<'a>(label: Option<&'a str>, sentinel: &'a str) -> &'a str {
    match label.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => sentinel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_blank_falls_back_to_sentinel() {
        assert_eq!(normalize(None, ONE_SIZE), ONE_SIZE);
        assert_eq!(normalize(Some(""), ONE_SIZE), ONE_SIZE);
        assert_eq!(normalize(Some("   "), DEFAULT_COLOR), DEFAULT_COLOR);
    }

    #[test]
    fn test_normalize_trims_labels() {
        assert_eq!(normalize(Some(" M "), ONE_SIZE), "M");
    }
}
