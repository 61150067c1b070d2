//! Public category handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::CategoryRepository;
use crate::error::Result;
use crate::models::CategorySummary;
use crate::state::AppState;

/// List all categories with their product counts.
///
/// GET /api/categories
///
/// # Errors
///
/// Returns an error if the database query fails.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CategorySummary>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}
