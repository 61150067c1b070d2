//! Catalog domain types: categories, products, and their satellites.

use chrono::{DateTime, Utc};
use serde::Serialize;

use driftwear_core::{CategoryId, ColorId, ImageId, Price, ProductId, ReviewId, SizeId, VariantId};

/// A product category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// URL slug, unique.
    pub slug: String,
    pub description: String,
}

/// Category with its product count, for the public category listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub product_count: i64,
}

/// A product row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// URL slug, unique.
    pub slug: String,
    pub description: String,
    pub price: Price,
    /// Aggregate stock counter, independent of per-size/per-color counters.
    pub stock: i32,
    pub featured: bool,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product card for list endpoints: the row plus its category name and
/// first image.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub stock: i32,
    pub featured: bool,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub image_url: Option<String>,
}

/// Per-size stock counter.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSize {
    pub id: SizeId,
    pub product_id: ProductId,
    pub size: String,
    pub stock: i32,
}

/// Per-color stock counter.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductColor {
    pub id: ColorId,
    pub product_id: ProductId,
    pub color: String,
    pub stock: i32,
}

/// A purchasable size/color combination with its own SKU.
///
/// Back-office bookkeeping only; checkout decrements the product, size, and
/// color counters, never variant stock.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    pub size: String,
    pub color: String,
    pub stock: i32,
    pub price_override: Option<Price>,
}

/// A product image, ordered by `position`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductImage {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: String,
    pub alt: String,
    pub position: i32,
}

/// A customer review, joined with the reviewer's display name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub rating: i32,
    pub comment: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

/// Full product payload for the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
    pub sizes: Vec<ProductSize>,
    pub colors: Vec<ProductColor>,
    pub variants: Vec<ProductVariant>,
    pub images: Vec<ProductImage>,
    pub reviews: Vec<Review>,
    /// Mean rating across `reviews`, absent when there are none.
    pub average_rating: Option<f64>,
}
