//! Product search handler.
//!
//! Plain SQL `ILIKE` matching over product names and descriptions. There
//! is no search engine behind this; the catalog is small enough that a
//! sequential scan with the listing query's filter does the job.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::{ProductFilter, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::ProductSummary;
use crate::routes::products::clamp_limit;
use crate::state::AppState;

/// Query parameters for search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// Search response payload.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// The query as it was matched, trimmed.
    pub query: String,
    pub results: Vec<ProductSummary>,
}

/// Search products by name or description.
///
/// GET /api/search?q=&limit=
///
/// # Errors
///
/// Returns 400 when `q` is missing or blank, or an error if the database
/// query fails.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    let term = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Search query is required".to_owned()))?;

    let filter = ProductFilter {
        category_slug: None,
        featured: None,
        search: Some(term.to_owned()),
    };
    let results = ProductRepository::new(state.pool())
        .list(&filter, clamp_limit(query.limit), 0)
        .await?;

    Ok(Json(SearchResponse {
        query: term.to_owned(),
        results,
    }))
}
