//! Checkout, order history, and inventory pre-check handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use driftwear_core::{OrderId, OrderStatus, ProductId};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::Order;
use crate::routes::products::clamp_limit;
use crate::services::checkout::{CheckoutItem, CheckoutRequest, CheckoutService};
use crate::services::inventory::{InventoryService, ItemAvailability};
use crate::state::AppState;

/// Execute a checkout for the current user.
///
/// POST /api/checkout
///
/// Resubmitting the same body creates a second order and decrements stock
/// again; there is no idempotency key.
///
/// # Errors
///
/// Returns 400 for validation failures or a declared total that doesn't
/// match, and 409 with a `STOCK_ERROR` message when any line can't be
/// fulfilled.
#[instrument(skip(user, state))]
pub async fn checkout(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Response> {
    let order = CheckoutService::new(state.pool())
        .checkout(user.id, &body)
        .await?;

    tracing::info!(order_id = %order.id, total = %order.total, "Checkout committed");
    Ok((StatusCode::CREATED, Json(order)).into_response())
}

/// Query for the order history / single order view.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub order_id: Option<OrderId>,
    pub limit: Option<i64>,
}

/// Fetch the caller's order history, or one order with its items.
///
/// GET /api/checkout?order_id=
///
/// With `order_id` the response is that order with items and shipping
/// address; without it, the caller's orders newest first.
///
/// # Errors
///
/// Returns 404 when the named order doesn't exist or belongs to someone
/// else.
#[instrument(skip(user, state))]
pub async fn history(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response> {
    let repo = OrderRepository::new(state.pool());
    match query.order_id {
        Some(order_id) => {
            let detail = repo
                .get_for_user(user.id, order_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;
            Ok(Json(detail).into_response())
        }
        None => {
            let orders = repo
                .list_for_user(user.id, clamp_limit(query.limit))
                .await?;
            Ok(Json(orders).into_response())
        }
    }
}

/// Query for the caller's order history.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub limit: Option<i64>,
}

/// Fetch the caller's order history, newest first.
///
/// GET /api/checkout/orders?limit=
///
/// # Errors
///
/// Returns an error if the database query fails.
#[instrument(skip(user, state))]
pub async fn orders(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id, clamp_limit(query.limit))
        .await?;
    Ok(Json(orders))
}

/// Request to update an order's status.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// Update an order's status. Admin only; kept alongside the admin route
/// for wire compatibility with older clients.
///
/// PATCH /api/checkout/orders
///
/// # Errors
///
/// Returns 401 for non-admin callers and 404 when the order doesn't
/// exist.
#[instrument(skip(_admin, state))]
pub async fn update_order_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update_status(body.order_id, body.status)
        .await?;
    Ok(Json(order))
}

/// Request body for the batch availability report.
#[derive(Debug, Deserialize)]
pub struct InventoryRequest {
    pub items: Vec<CheckoutItem>,
}

/// Availability report response.
#[derive(Debug, Serialize)]
pub struct InventoryReport {
    pub items: Vec<ItemAvailability>,
    pub all_available: bool,
}

impl InventoryReport {
    fn new(items: Vec<ItemAvailability>) -> Self {
        let all_available = items.iter().all(|item| item.available);
        Self {
            items,
            all_available,
        }
    }
}

/// Report availability for a batch of items without reserving anything.
///
/// POST /api/checkout/inventory
///
/// The report is advisory; stock may move between this check and the
/// checkout itself.
///
/// # Errors
///
/// Returns an error if any stock lookup fails.
#[instrument(skip(_user, state))]
pub async fn check_inventory(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<InventoryRequest>,
) -> Result<Json<InventoryReport>> {
    let items = InventoryService::new(state.pool())
        .check_items(&body.items)
        .await?;
    Ok(Json(InventoryReport::new(items)))
}

/// Query for the single-item availability report.
#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

const fn default_quantity() -> i32 {
    1
}

/// Report availability for a single item.
///
/// GET /api/checkout/inventory?product_id=&quantity=&size=&color=
///
/// # Errors
///
/// Returns an error if the stock lookup fails.
#[instrument(skip(_user, state))]
pub async fn check_inventory_item(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<ItemAvailability>> {
    let item = CheckoutItem {
        product_id: query.product_id,
        quantity: query.quantity,
        size: query.size,
        color: query.color,
    };
    let report = InventoryService::new(state.pool()).check_item(&item).await?;
    Ok(Json(report))
}
