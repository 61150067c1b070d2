//! Admin order handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use driftwear_core::{OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{AdminOrderDetail, Order, OrderSummary};
use crate::routes::products::clamp_limit;
use crate::state::AppState;

/// Query parameters for the admin order listing.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Status filter, e.g. `PAID`.
    pub status: Option<OrderStatus>,
    pub limit: Option<i64>,
}

/// Request to set an order's status. The status set is flat; any value
/// may overwrite any other.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// List all orders with customer email and item counts, newest first.
///
/// GET /api/admin/orders?status=&limit=
///
/// # Errors
///
/// Returns an error if the database query fails.
#[instrument(skip(_admin, state))]
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<OrderSummary>>> {
    let orders = OrderRepository::new(state.pool())
        .list_all(query.status, clamp_limit(query.limit))
        .await?;
    Ok(Json(orders))
}

/// Fetch one order with its items, shipping address, and customer email.
///
/// GET /api/admin/orders/{id}
///
/// # Errors
///
/// Returns 404 if the order doesn't exist.
#[instrument(skip(_admin, state))]
pub async fn show(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<AdminOrderDetail>> {
    let detail = OrderRepository::new(state.pool())
        .get_admin_detail(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;
    Ok(Json(detail))
}

/// Set an order's status.
///
/// PATCH /api/admin/orders/{id}
///
/// # Errors
///
/// Returns 404 if the order doesn't exist.
#[instrument(skip(_admin, state))]
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update_status(order_id, body.status)
        .await?;

    tracing::info!(order_id = %order.id, status = %order.status, "Order status updated");
    Ok(Json(order))
}
