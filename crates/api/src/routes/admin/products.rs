//! Admin product handlers, including the nested size, color, variant,
//! and image resources.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer};
use tracing::instrument;

use driftwear_core::{CategoryId, ColorId, ImageId, Price, ProductId, SizeId, VariantId};

use crate::db::{
    CategoryRepository, NewProduct, ProductChanges, ProductFilter, ProductRepository,
    VariantChanges,
};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{
    Product, ProductColor, ProductDetail, ProductSize, ProductSummary, ProductVariant,
};
use crate::routes::products::clamp_limit;
use crate::state::AppState;

/// Distinguishes an absent field from an explicit `null` so updates can
/// clear nullable columns.
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

fn require_non_blank(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_non_negative(value: i32, field: &str) -> Result<()> {
    if value < 0 {
        return Err(AppError::BadRequest(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

/// Rejects a category assignment before the insert so the caller gets a 400
/// instead of a foreign-key failure.
async fn require_category_exists(state: &AppState, category_id: CategoryId) -> Result<()> {
    CategoryRepository::new(state.pool())
        .get_by_id(category_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("category {category_id} does not exist")))?;
    Ok(())
}

// ============================================================================
// Products
// ============================================================================

/// Query parameters for the admin product listing.
#[derive(Debug, Default, Deserialize)]
pub struct AdminProductsQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// Request to create a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// Partial update for a product. Absent fields are left untouched;
/// `category_id: null` clears the category.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    /// Explicit slug text; slugified and de-duplicated server-side.
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub stock: Option<i32>,
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<CategoryId>>,
}

/// List products for the back office. Unlike the storefront listing this
/// includes zero-stock and non-featured products by default.
///
/// GET /api/admin/products?category=&featured=&q=&limit=
///
/// # Errors
///
/// Returns an error if the database query fails.
#[instrument(skip(_admin, state))]
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<AdminProductsQuery>,
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

/// Create a product. The slug is derived from the name and de-duplicated
/// with a numeric suffix on collision.
///
/// POST /api/admin/products
///
/// # Errors
///
/// Returns 400 for a blank name, negative stock, or unknown category.
#[instrument(skip(_admin, state))]
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<Response> {
    require_non_blank(&body.name, "name")?;
    require_non_negative(body.stock, "stock")?;
    if let Some(category_id) = body.category_id {
        require_category_exists(&state, category_id).await?;
    }

    let product = ProductRepository::new(state.pool())
        .create(NewProduct {
            name: body.name.trim(),
            description: &body.description,
            price: body.price,
            stock: body.stock,
            featured: body.featured,
            category_id: body.category_id,
        })
        .await?;

    tracing::info!(product_id = %product.id, slug = %product.slug, "Product created");
    Ok((StatusCode::CREATED, Json(product)).into_response())
}

/// Fetch one product with all satellite rows.
///
/// GET /api/admin/products/{id}
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
#[instrument(skip(_admin, state))]
pub async fn show(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ProductDetail>> {
    let detail = ProductRepository::new(state.pool())
        .get_detail_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;
    Ok(Json(detail))
}

/// Partially update a product.
///
/// PUT /api/admin/products/{id}
///
/// The slug changes only when an explicit `slug` is given or the name
/// changes without one; either way it is slugified and de-duplicated.
///
/// # Errors
///
/// Returns 400 for blank name/slug text, negative stock, or an unknown
/// category, 404 if the product doesn't exist, and 409 if the slug collides.
#[instrument(skip(_admin, state))]
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    if let Some(name) = body.name.as_deref() {
        require_non_blank(name, "name")?;
    }
    if let Some(slug) = body.slug.as_deref() {
        require_non_blank(slug, "slug")?;
    }
    if let Some(stock) = body.stock {
        require_non_negative(stock, "stock")?;
    }
    if let Some(Some(category_id)) = body.category_id {
        require_category_exists(&state, category_id).await?;
    }

    // An explicit slug wins; otherwise a name change regenerates the slug.
    let slug_source = body.slug.as_deref().or(body.name.as_deref());

    let product = ProductRepository::new(state.pool())
        .update(
            product_id,
            ProductChanges {
                name: body.name.as_deref().map(str::trim),
                slug: slug_source,
                description: body.description.as_deref(),
                price: body.price,
                stock: body.stock,
                featured: body.featured,
                category: body.category_id,
            },
        )
        .await?;

    Ok(Json(product))
}

/// Delete a product. Sizes, colors, variants, images, and cart rows go
/// with it; order items keep their snapshot.
///
/// DELETE /api/admin/products/{id}
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
#[instrument(skip(_admin, state))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .delete(product_id)
        .await?;

    tracing::info!(product_id = %product_id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Sizes
// ============================================================================

/// Request to add a size to a product.
#[derive(Debug, Deserialize)]
pub struct CreateSizeRequest {
    pub size: String,
    #[serde(default)]
    pub stock: i32,
}

/// Partial update for a size row.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSizeRequest {
    pub size: Option<String>,
    pub stock: Option<i32>,
}

/// Add a size row to a product.
///
/// POST /api/admin/products/{id}/sizes
///
/// # Errors
///
/// Returns 400 for a blank label or negative stock, 404 when the product
/// doesn't exist, and 409 when the product already has that size.
#[instrument(skip(_admin, state))]
pub async fn create_size(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(body): Json<CreateSizeRequest>,
) -> Result<Response> {
    require_non_blank(&body.size, "size")?;
    require_non_negative(body.stock, "stock")?;

    let size = ProductRepository::new(state.pool())
        .add_size(product_id, body.size.trim(), body.stock)
        .await?;
    Ok((StatusCode::CREATED, Json(size)).into_response())
}

/// Update a size row's label or stock.
///
/// PUT /api/admin/products/{id}/sizes/{size_id}
///
/// # Errors
///
/// Returns 404 if the size row doesn't exist on this product and 409 on
/// a label collision.
#[instrument(skip(_admin, state))]
pub async fn update_size(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((product_id, size_id)): Path<(ProductId, SizeId)>,
    Json(body): Json<UpdateSizeRequest>,
) -> Result<Json<ProductSize>> {
    if let Some(size) = body.size.as_deref() {
        require_non_blank(size, "size")?;
    }
    if let Some(stock) = body.stock {
        require_non_negative(stock, "stock")?;
    }

    let size = ProductRepository::new(state.pool())
        .update_size(
            product_id,
            size_id,
            body.size.as_deref().map(str::trim),
            body.stock,
        )
        .await?;
    Ok(Json(size))
}

/// Remove a size row.
///
/// DELETE /api/admin/products/{id}/sizes/{size_id}
///
/// # Errors
///
/// Returns 404 if the size row doesn't exist on this product.
#[instrument(skip(_admin, state))]
pub async fn delete_size(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((product_id, size_id)): Path<(ProductId, SizeId)>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .remove_size(product_id, size_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Colors
// ============================================================================

/// Request to add a color to a product.
#[derive(Debug, Deserialize)]
pub struct CreateColorRequest {
    pub color: String,
    #[serde(default)]
    pub stock: i32,
}

/// Partial update for a color row.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateColorRequest {
    pub color: Option<String>,
    pub stock: Option<i32>,
}

/// Add a color row to a product.
///
/// POST /api/admin/products/{id}/colors
///
/// # Errors
///
/// Returns 400 for a blank label or negative stock, 404 when the product
/// doesn't exist, and 409 when the product already has that color.
#[instrument(skip(_admin, state))]
pub async fn create_color(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(body): Json<CreateColorRequest>,
) -> Result<Response> {
    require_non_blank(&body.color, "color")?;
    require_non_negative(body.stock, "stock")?;

    let color = ProductRepository::new(state.pool())
        .add_color(product_id, body.color.trim(), body.stock)
        .await?;
    Ok((StatusCode::CREATED, Json(color)).into_response())
}

/// Update a color row's label or stock.
///
/// PUT /api/admin/products/{id}/colors/{color_id}
///
/// # Errors
///
/// Returns 404 if the color row doesn't exist on this product and 409 on
/// a label collision.
#[instrument(skip(_admin, state))]
pub async fn update_color(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((product_id, color_id)): Path<(ProductId, ColorId)>,
    Json(body): Json<UpdateColorRequest>,
) -> Result<Json<ProductColor>> {
    if let Some(color) = body.color.as_deref() {
        require_non_blank(color, "color")?;
    }
    if let Some(stock) = body.stock {
        require_non_negative(stock, "stock")?;
    }

    let color = ProductRepository::new(state.pool())
        .update_color(
            product_id,
            color_id,
            body.color.as_deref().map(str::trim),
            body.stock,
        )
        .await?;
    Ok(Json(color))
}

/// Remove a color row.
///
/// DELETE /api/admin/products/{id}/colors/{color_id}
///
/// # Errors
///
/// Returns 404 if the color row doesn't exist on this product.
#[instrument(skip(_admin, state))]
pub async fn delete_color(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((product_id, color_id)): Path<(ProductId, ColorId)>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .remove_color(product_id, color_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Variants
// ============================================================================

/// Request to add a variant to a product.
#[derive(Debug, Deserialize)]
pub struct CreateVariantRequest {
    pub sku: String,
    pub size: String,
    pub color: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub price_override: Option<Price>,
}

/// Partial update for a variant. `price_override: null` clears the
/// override back to the base price.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVariantRequest {
    pub sku: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub price_override: Option<Option<Price>>,
}

/// Add a variant row to a product.
///
/// POST /api/admin/products/{id}/variants
///
/// # Errors
///
/// Returns 400 for blank fields or negative stock, 404 when the product
/// doesn't exist, and 409 on SKU or size/color collision.
#[instrument(skip(_admin, state))]
pub async fn create_variant(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(body): Json<CreateVariantRequest>,
) -> Result<Response> {
    require_non_blank(&body.sku, "sku")?;
    require_non_blank(&body.size, "size")?;
    require_non_blank(&body.color, "color")?;
    require_non_negative(body.stock, "stock")?;

    let variant = ProductRepository::new(state.pool())
        .add_variant(
            product_id,
            body.sku.trim(),
            body.size.trim(),
            body.color.trim(),
            body.stock,
            body.price_override,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(variant)).into_response())
}

/// Update a variant row.
///
/// PUT /api/admin/products/{id}/variants/{variant_id}
///
/// # Errors
///
/// Returns 404 if the variant doesn't exist on this product and 409 on
/// SKU or size/color collision.
#[instrument(skip(_admin, state))]
pub async fn update_variant(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((product_id, variant_id)): Path<(ProductId, VariantId)>,
    Json(body): Json<UpdateVariantRequest>,
) -> Result<Json<ProductVariant>> {
    if let Some(sku) = body.sku.as_deref() {
        require_non_blank(sku, "sku")?;
    }
    if let Some(stock) = body.stock {
        require_non_negative(stock, "stock")?;
    }

    let variant = ProductRepository::new(state.pool())
        .update_variant(
            product_id,
            variant_id,
            VariantChanges {
                sku: body.sku.as_deref().map(str::trim),
                size: body.size.as_deref().map(str::trim),
                color: body.color.as_deref().map(str::trim),
                stock: body.stock,
                price_override: body.price_override,
            },
        )
        .await?;
    Ok(Json(variant))
}

/// Remove a variant row.
///
/// DELETE /api/admin/products/{id}/variants/{variant_id}
///
/// # Errors
///
/// Returns 404 if the variant doesn't exist on this product.
#[instrument(skip(_admin, state))]
pub async fn delete_variant(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((product_id, variant_id)): Path<(ProductId, VariantId)>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .remove_variant(product_id, variant_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Images
// ============================================================================

/// Request to add a gallery image.
#[derive(Debug, Deserialize)]
pub struct CreateImageRequest {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub position: i32,
}

/// Add a gallery image to a product.
///
/// POST /api/admin/products/{id}/images
///
/// # Errors
///
/// Returns 400 for a blank URL and 404 when the product doesn't exist.
#[instrument(skip(_admin, state))]
pub async fn create_image(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(body): Json<CreateImageRequest>,
) -> Result<Response> {
    require_non_blank(&body.url, "url")?;

    let image = ProductRepository::new(state.pool())
        .add_image(product_id, body.url.trim(), &body.alt, body.position)
        .await?;
    Ok((StatusCode::CREATED, Json(image)).into_response())
}

/// Remove a gallery image.
///
/// DELETE /api/admin/products/{id}/images/{image_id}
///
/// # Errors
///
/// Returns 404 if the image doesn't exist on this product.
#[instrument(skip(_admin, state))]
pub async fn delete_image(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((product_id, image_id)): Path<(ProductId, ImageId)>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .remove_image(product_id, image_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "double_option")]
        category_id: Option<Option<CategoryId>>,
    }

    #[test]
    fn test_double_option_absent_field() {
        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.category_id, None);
    }

    #[test]
    fn test_double_option_explicit_null() {
        let probe: Probe = serde_json::from_str(r#"{"category_id": null}"#).unwrap();
        assert_eq!(probe.category_id, Some(None));
    }

    #[test]
    fn test_double_option_value() {
        let probe: Probe = serde_json::from_str(r#"{"category_id": 3}"#).unwrap();
        assert_eq!(probe.category_id, Some(Some(CategoryId::new(3))));
    }
}
