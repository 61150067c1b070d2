//! Admin dashboard handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use driftwear_core::Price;

use crate::db::{OrderRepository, ProductRepository, StatusCount, UserRepository};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{OrderSummary, Product};
use crate::state::AppState;

/// Stock at or below this counts as low for the dashboard panel.
const LOW_STOCK_THRESHOLD: i32 = 5;

/// How many low-stock products and recent orders the dashboard shows.
const PANEL_LIMIT: i64 = 10;

/// Dashboard payload.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Order counts broken down by status.
    pub orders_by_status: Vec<StatusCount>,
    pub total_products: i64,
    pub total_users: i64,
    /// Sum of order totals, cancelled orders excluded.
    pub revenue: Price,
    pub low_stock_products: Vec<Product>,
    pub recent_orders: Vec<OrderSummary>,
}

/// Back-office overview: counts, revenue, low stock, recent orders.
///
/// GET /api/admin/dashboard
///
/// # Errors
///
/// Returns an error if any of the underlying queries fail.
#[instrument(skip(_admin, state))]
pub async fn dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>> {
    let orders = OrderRepository::new(state.pool());
    let products = ProductRepository::new(state.pool());
    let users = UserRepository::new(state.pool());

    let orders_by_status = orders.count_by_status().await?;
    let total_products = products.count().await?;
    let total_users = users.count().await?;
    let revenue = orders.revenue().await?;
    let low_stock_products = products
        .list_low_stock(LOW_STOCK_THRESHOLD, PANEL_LIMIT)
        .await?;
    let recent_orders = orders.list_all(None, PANEL_LIMIT).await?;

    Ok(Json(DashboardResponse {
        orders_by_status,
        total_products,
        total_users,
        revenue,
        low_stock_products,
        recent_orders,
    }))
}
