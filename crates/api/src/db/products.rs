//! Product repository for catalog and inventory database operations.
//!
//! Covers the `products` table plus its satellite tables: per-size and
//! per-color stock counters, purchasable variants, gallery images and
//! customer reviews.

use sqlx::PgPool;

use driftwear_core::{CategoryId, ColorId, ImageId, Price, ProductId, SizeId, VariantId, slugify};

use super::RepositoryError;
use crate::models::{
    Category, Product, ProductColor, ProductDetail, ProductImage, ProductSize, ProductSummary,
    ProductVariant, Review,
};

const PRODUCT_COLUMNS: &str =
    "id, name, slug, description, price, stock, featured, category_id, created_at, updated_at";

/// How many numeric suffixes to try before giving up on slug allocation.
const MAX_SLUG_ATTEMPTS: u32 = 50;

/// Filters for the public product listing.
#[derive(Debug, Default)]
pub struct ProductFilter {
    pub category_slug: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

/// Fields for creating a product. The slug is derived from the name.
#[derive(Debug)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: Price,
    pub stock: i32,
    pub featured: bool,
    pub category_id: Option<CategoryId>,
}

/// Partial update for a product. `None` leaves the column unchanged;
/// `category` uses a second `Option` so the category can be cleared.
///
/// `slug` carries the raw text to derive the new slug from (an explicit
/// slug from the caller, or the new name); the repository slugifies and
/// de-duplicates it.
#[derive(Debug, Default)]
pub struct ProductChanges<'a> {
    pub name: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<Price>,
    pub stock: Option<i32>,
    pub featured: Option<bool>,
    pub category: Option<Option<CategoryId>>,
}

/// Partial update for a variant. `price_override` uses a second `Option`
/// so the override can be cleared back to the base price.
#[derive(Debug, Default)]
pub struct VariantChanges<'a> {
    pub sku: Option<&'a str>,
    pub size: Option<&'a str>,
    pub color: Option<&'a str>,
    pub stock: Option<i32>,
    pub price_override: Option<Option<Price>>,
}

/// Name and aggregate stock for a product, used by availability checks.
#[derive(Debug, sqlx::FromRow)]
pub struct StockLevel {
    pub name: String,
    pub stock: i32,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products for the storefront, newest first.
    ///
    /// All filters are optional and combine with AND. The search term
    /// matches name or description, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductSummary>(
            "SELECT p.id, p.name, p.slug, p.description, p.price, p.stock, p.featured, \
                    c.name AS category_name, c.slug AS category_slug, \
                    (SELECT pi.url FROM product_images pi \
                     WHERE pi.product_id = p.id \
                     ORDER BY pi.position ASC, pi.id ASC LIMIT 1) AS image_url \
             FROM products p \
             LEFT JOIN categories c ON c.id = p.category_id \
             WHERE ($1::text IS NULL OR c.slug = $1) \
               AND ($2::boolean IS NULL OR p.featured = $2) \
               AND ($3::text IS NULL \
                    OR p.name ILIKE '%' || $3 || '%' \
                    OR p.description ILIKE '%' || $3 || '%') \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT $4 OFFSET $5",
        )
        .bind(filter.category_slug.as_deref())
        .bind(filter.featured)
        .bind(filter.search.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product row by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product row by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product with all its satellite data, looked up by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn get_detail_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let Some(product) = self.get_by_slug(slug).await? else {
            return Ok(None);
        };
        self.load_detail(product).await.map(Some)
    }

    /// Get a product with all its satellite data, looked up by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn get_detail_by_id(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let Some(product) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        self.load_detail(product).await.map(Some)
    }

    async fn load_detail(&self, product: Product) -> Result<ProductDetail, RepositoryError> {
        let category = match product.category_id {
            Some(category_id) => {
                sqlx::query_as::<_, Category>(
                    "SELECT id, name, slug, description FROM categories WHERE id = $1",
                )
                .bind(category_id)
                .fetch_optional(self.pool)
                .await?
            }
            None => None,
        };

        let sizes = self.list_sizes(product.id).await?;
        let colors = self.list_colors(product.id).await?;
        let variants = self.list_variants(product.id).await?;
        let images = self.list_images(product.id).await?;
        let reviews = self.list_reviews(product.id).await?;

        let average_rating = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(rating)::float8 FROM reviews WHERE product_id = $1",
        )
        .bind(product.id)
        .fetch_one(self.pool)
        .await?;

        Ok(ProductDetail {
            product,
            category,
            sizes,
            colors,
            variants,
            images,
            reviews,
            average_rating,
        })
    }

    /// Create a product, deriving a unique slug from its name.
    ///
    /// When the slugified name is taken, numeric suffixes (`-2`, `-3`, ...)
    /// are tried in order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if no unique slug could be found.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: NewProduct<'_>) -> Result<Product, RepositoryError> {
        let mut base = slugify(new.name);
        if base.is_empty() {
            base = "product".to_owned();
        }

        for attempt in 0..MAX_SLUG_ATTEMPTS {
            let slug = if attempt == 0 {
                base.clone()
            } else {
                format!("{base}-{}", attempt + 1)
            };
            match self.insert(&new, &slug).await {
                Err(RepositoryError::Conflict(_)) => {}
                other => return other,
            }
        }

        Err(RepositoryError::Conflict(format!(
            "could not allocate a unique slug for '{base}'"
        )))
    }

    async fn insert(&self, new: &NewProduct<'_>, slug: &str) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, slug, description, price, stock, featured, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(new.name)
        .bind(slug)
        .bind(new.description)
        .bind(new.price)
        .bind(new.stock)
        .bind(new.featured)
        .bind(new.category_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "slug already exists"))?;

        Ok(product)
    }

    /// Apply a partial update to a product.
    ///
    /// When `changes.slug` is set, a fresh slug is derived from it and
    /// de-duplicated with numeric suffixes like `create`; otherwise the
    /// slug stays as it is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist,
    /// and `RepositoryError::Conflict` if no unique slug could be found.
    pub async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges<'_>,
    ) -> Result<Product, RepositoryError> {
        let Some(slug_source) = changes.slug else {
            return self.apply_update(id, &changes, None).await;
        };

        let mut base = slugify(slug_source);
        if base.is_empty() {
            base = "product".to_owned();
        }

        for attempt in 0..MAX_SLUG_ATTEMPTS {
            let slug = if attempt == 0 {
                base.clone()
            } else {
                format!("{base}-{}", attempt + 1)
            };
            match self.apply_update(id, &changes, Some(&slug)).await {
                Err(RepositoryError::Conflict(_)) => {}
                other => return other,
            }
        }

        Err(RepositoryError::Conflict(format!(
            "could not allocate a unique slug for '{base}'"
        )))
    }

    async fn apply_update(
        &self,
        id: ProductId,
        changes: &ProductChanges<'_>,
        slug: Option<&str>,
    ) -> Result<Product, RepositoryError> {
        let (set_category, category_id) = match changes.category {
            Some(category_id) => (true, category_id),
            None => (false, None),
        };

        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET \
                name = COALESCE($2, name), \
                slug = COALESCE($3, slug), \
                description = COALESCE($4, description), \
                price = COALESCE($5, price), \
                stock = COALESCE($6, stock), \
                featured = COALESCE($7, featured), \
                category_id = CASE WHEN $8 THEN $9 ELSE category_id END, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name)
        .bind(slug)
        .bind(changes.description)
        .bind(changes.price)
        .bind(changes.stock)
        .bind(changes.featured)
        .bind(set_category)
        .bind(category_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "slug already exists"))?;

        product.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Cart rows referencing it go with it; order line
    /// items keep their name and price snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Count all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// List products whose aggregate stock is at or below a threshold.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_low_stock(
        &self,
        threshold: i32,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE stock <= $1 \
             ORDER BY stock ASC, name ASC \
             LIMIT $2"
        ))
        .bind(threshold)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Look up a product's name and aggregate stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_stock(&self, id: ProductId) -> Result<Option<StockLevel>, RepositoryError> {
        let level = sqlx::query_as::<_, StockLevel>(
            "SELECT name, stock FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(level)
    }

    /// Look up the stock counter for one named size of a product.
    ///
    /// Returns `None` when the product has no row for that size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_size_stock(
        &self,
        product_id: ProductId,
        size: &str,
    ) -> Result<Option<i32>, RepositoryError> {
        let stock = sqlx::query_scalar::<_, i32>(
            "SELECT stock FROM product_sizes WHERE product_id = $1 AND size = $2",
        )
        .bind(product_id)
        .bind(size)
        .fetch_optional(self.pool)
        .await?;

        Ok(stock)
    }

    /// Look up the stock counter for one named color of a product.
    ///
    /// Returns `None` when the product has no row for that color.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_color_stock(
        &self,
        product_id: ProductId,
        color: &str,
    ) -> Result<Option<i32>, RepositoryError> {
        let stock = sqlx::query_scalar::<_, i32>(
            "SELECT stock FROM product_colors WHERE product_id = $1 AND color = $2",
        )
        .bind(product_id)
        .bind(color)
        .fetch_optional(self.pool)
        .await?;

        Ok(stock)
    }

    /// List a product's sizes in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_sizes(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductSize>, RepositoryError> {
        let sizes = sqlx::query_as::<_, ProductSize>(
            "SELECT id, product_id, size, stock FROM product_sizes \
             WHERE product_id = $1 ORDER BY id ASC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(sizes)
    }

    /// Add a size row to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if the product already has that size.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_size(
        &self,
        product_id: ProductId,
        size: &str,
        stock: i32,
    ) -> Result<ProductSize, RepositoryError> {
        let row = sqlx::query_as::<_, ProductSize>(
            "INSERT INTO product_sizes (product_id, size, stock) \
             VALUES ($1, $2, $3) \
             RETURNING id, product_id, size, stock",
        )
        .bind(product_id)
        .bind(size)
        .bind(stock)
        .fetch_one(self.pool)
        .await
        .map_err(|e| satellite_insert_error(e, "size already exists for this product"))?;

        Ok(row)
    }

    /// Update a size row's label or stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the size row doesn't exist on
    /// this product, and `RepositoryError::Conflict` if renaming collides
    /// with another size.
    pub async fn update_size(
        &self,
        product_id: ProductId,
        size_id: SizeId,
        size: Option<&str>,
        stock: Option<i32>,
    ) -> Result<ProductSize, RepositoryError> {
        let row = sqlx::query_as::<_, ProductSize>(
            "UPDATE product_sizes SET \
                size = COALESCE($3, size), \
                stock = COALESCE($4, stock) \
             WHERE id = $2 AND product_id = $1 \
             RETURNING id, product_id, size, stock",
        )
        .bind(product_id)
        .bind(size_id)
        .bind(size)
        .bind(stock)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "size already exists for this product"))?;

        row.ok_or(RepositoryError::NotFound)
    }

    /// Remove a size row from a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the size row doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove_size(
        &self,
        product_id: ProductId,
        size_id: SizeId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product_sizes WHERE id = $2 AND product_id = $1")
            .bind(product_id)
            .bind(size_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List a product's colors in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_colors(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductColor>, RepositoryError> {
        let colors = sqlx::query_as::<_, ProductColor>(
            "SELECT id, product_id, color, stock FROM product_colors \
             WHERE product_id = $1 ORDER BY id ASC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(colors)
    }

    /// Add a color row to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if the product already has that color.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_color(
        &self,
        product_id: ProductId,
        color: &str,
        stock: i32,
    ) -> Result<ProductColor, RepositoryError> {
        let row = sqlx::query_as::<_, ProductColor>(
            "INSERT INTO product_colors (product_id, color, stock) \
             VALUES ($1, $2, $3) \
             RETURNING id, product_id, color, stock",
        )
        .bind(product_id)
        .bind(color)
        .bind(stock)
        .fetch_one(self.pool)
        .await
        .map_err(|e| satellite_insert_error(e, "color already exists for this product"))?;

        Ok(row)
    }

    /// Update a color row's label or stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the color row doesn't exist on
    /// this product, and `RepositoryError::Conflict` if renaming collides
    /// with another color.
    pub async fn update_color(
        &self,
        product_id: ProductId,
        color_id: ColorId,
        color: Option<&str>,
        stock: Option<i32>,
    ) -> Result<ProductColor, RepositoryError> {
        let row = sqlx::query_as::<_, ProductColor>(
            "UPDATE product_colors SET \
                color = COALESCE($3, color), \
                stock = COALESCE($4, stock) \
             WHERE id = $2 AND product_id = $1 \
             RETURNING id, product_id, color, stock",
        )
        .bind(product_id)
        .bind(color_id)
        .bind(color)
        .bind(stock)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "color already exists for this product"))?;

        row.ok_or(RepositoryError::NotFound)
    }

    /// Remove a color row from a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the color row doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove_color(
        &self,
        product_id: ProductId,
        color_id: ColorId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product_colors WHERE id = $2 AND product_id = $1")
            .bind(product_id)
            .bind(color_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List a product's variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_variants(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductVariant>, RepositoryError> {
        let variants = sqlx::query_as::<_, ProductVariant>(
            "SELECT id, product_id, sku, size, color, stock, price_override \
             FROM product_variants \
             WHERE product_id = $1 ORDER BY id ASC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(variants)
    }

    /// Add a variant row to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if the SKU is taken or the
    /// size/color pair already exists for this product.
    pub async fn add_variant(
        &self,
        product_id: ProductId,
        sku: &str,
        size: &str,
        color: &str,
        stock: i32,
        price_override: Option<Price>,
    ) -> Result<ProductVariant, RepositoryError> {
        let row = sqlx::query_as::<_, ProductVariant>(
            "INSERT INTO product_variants (product_id, sku, size, color, stock, price_override) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, product_id, sku, size, color, stock, price_override",
        )
        .bind(product_id)
        .bind(sku)
        .bind(size)
        .bind(color)
        .bind(stock)
        .bind(price_override)
        .fetch_one(self.pool)
        .await
        .map_err(|e| satellite_insert_error(e, "variant already exists"))?;

        Ok(row)
    }

    /// Update a variant row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant doesn't exist on
    /// this product, and `RepositoryError::Conflict` on SKU or size/color
    /// collisions.
    pub async fn update_variant(
        &self,
        product_id: ProductId,
        variant_id: VariantId,
        changes: VariantChanges<'_>,
    ) -> Result<ProductVariant, RepositoryError> {
        let (set_override, price_override) = match changes.price_override {
            Some(price_override) => (true, price_override),
            None => (false, None),
        };

        let row = sqlx::query_as::<_, ProductVariant>(
            "UPDATE product_variants SET \
                sku = COALESCE($3, sku), \
                size = COALESCE($4, size), \
                color = COALESCE($5, color), \
                stock = COALESCE($6, stock), \
                price_override = CASE WHEN $7 THEN $8 ELSE price_override END \
             WHERE id = $2 AND product_id = $1 \
             RETURNING id, product_id, sku, size, color, stock, price_override",
        )
        .bind(product_id)
        .bind(variant_id)
        .bind(changes.sku)
        .bind(changes.size)
        .bind(changes.color)
        .bind(changes.stock)
        .bind(set_override)
        .bind(price_override)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "variant already exists"))?;

        row.ok_or(RepositoryError::NotFound)
    }

    /// Remove a variant row from a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove_variant(
        &self,
        product_id: ProductId,
        variant_id: VariantId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product_variants WHERE id = $2 AND product_id = $1")
            .bind(product_id)
            .bind(variant_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List a product's gallery images in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_images(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductImage>, RepositoryError> {
        let images = sqlx::query_as::<_, ProductImage>(
            "SELECT id, product_id, url, alt, position FROM product_images \
             WHERE product_id = $1 ORDER BY position ASC, id ASC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(images)
    }

    /// Add a gallery image to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_image(
        &self,
        product_id: ProductId,
        url: &str,
        alt: &str,
        position: i32,
    ) -> Result<ProductImage, RepositoryError> {
        let row = sqlx::query_as::<_, ProductImage>(
            "INSERT INTO product_images (product_id, url, alt, position) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, product_id, url, alt, position",
        )
        .bind(product_id)
        .bind(url)
        .bind(alt)
        .bind(position)
        .fetch_one(self.pool)
        .await
        .map_err(|e| satellite_insert_error(e, "image already exists"))?;

        Ok(row)
    }

    /// Remove a gallery image from a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the image doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove_image(
        &self,
        product_id: ProductId,
        image_id: ImageId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product_images WHERE id = $2 AND product_id = $1")
            .bind(product_id)
            .bind(image_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_reviews(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT r.id, r.rating, r.comment, u.name AS user_name, r.created_at \
             FROM reviews r \
             JOIN users u ON u.id = r.user_id \
             WHERE r.product_id = $1 \
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }
}

/// Error mapping for inserts into a product's satellite tables: a missing
/// parent product surfaces as `NotFound`, a unique violation as `Conflict`.
fn satellite_insert_error(e: sqlx::Error, conflict_msg: &str) -> RepositoryError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            RepositoryError::NotFound
        }
        other => RepositoryError::from_sqlx(other, conflict_msg),
    }
}
