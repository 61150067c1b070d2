//! Seed the database with demo catalog data and accounts.
//!
//! Inserts categories, products with their sizes, colors, variants, and
//! images, a demo customer, a demo admin, and a few reviews. Everything
//! goes in with `ON CONFLICT DO NOTHING` keyed on the natural unique
//! columns, so re-running the command is safe.
//!
//! # Usage
//!
//! ```bash
//! dw-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `API_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;

use driftwear_api::db::create_pool;
use driftwear_api::services::auth::hash_password;
use driftwear_core::{CategoryId, Email, Price, PriceError, ProductId, UserId, UserRole};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A seed price failed to parse.
    #[error("Invalid seed price: {0}")]
    Price(#[from] PriceError),

    /// A hard-coded seed value is malformed.
    #[error("Invalid seed data: {0}")]
    InvalidSeedData(String),

    /// Password hashing failed.
    #[error("Failed to hash password")]
    Hash,
}

struct SeedCategory {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
}

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    price: &'static str,
    stock: i32,
    featured: bool,
    category_slug: &'static str,
    /// (size label, stock)
    sizes: &'static [(&'static str, i32)],
    /// (color label, stock)
    colors: &'static [(&'static str, i32)],
    /// (sku, size, color, stock)
    variants: &'static [(&'static str, &'static str, &'static str, i32)],
    /// (url, alt)
    images: &'static [(&'static str, &'static str)],
}

struct SeedReview {
    product_slug: &'static str,
    rating: i32,
    comment: &'static str,
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Tees",
        slug: "tees",
        description: "Core cotton tees, cut loose for the beach",
    },
    SeedCategory {
        name: "Hoodies",
        slug: "hoodies",
        description: "Heavyweight fleece for cold water mornings",
    },
    SeedCategory {
        name: "Boardshorts",
        slug: "boardshorts",
        description: "Quick-dry boardshorts with four-way stretch",
    },
    SeedCategory {
        name: "Accessories",
        slug: "accessories",
        description: "Caps, totes and everything else",
    },
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Classic Logo Tee",
        slug: "classic-logo-tee",
        description: "Midweight combed cotton with the Driftwear wordmark across the chest.",
        price: "24.00",
        stock: 120,
        featured: true,
        category_slug: "tees",
        sizes: &[("S", 30), ("M", 30), ("L", 30), ("XL", 30)],
        colors: &[("Black", 40), ("White", 40), ("Sand", 40)],
        variants: &[
            ("DW-TEE-BLK-M", "M", "Black", 10),
            ("DW-TEE-BLK-L", "L", "Black", 10),
            ("DW-TEE-WHT-M", "M", "White", 10),
        ],
        images: &[
            (
                "https://images.driftwear.dev/classic-logo-tee-front.jpg",
                "Classic Logo Tee, front",
            ),
            (
                "https://images.driftwear.dev/classic-logo-tee-back.jpg",
                "Classic Logo Tee, back",
            ),
        ],
    },
    SeedProduct {
        name: "Driftwood Hoodie",
        slug: "driftwood-hoodie",
        description: "450gsm brushed fleece, dropped shoulders, double-lined hood.",
        price: "68.00",
        stock: 60,
        featured: true,
        category_slug: "hoodies",
        sizes: &[("S", 15), ("M", 15), ("L", 15), ("XL", 15)],
        colors: &[("Charcoal", 30), ("Rust", 30)],
        variants: &[
            ("DW-HOOD-CHR-M", "M", "Charcoal", 8),
            ("DW-HOOD-RST-L", "L", "Rust", 8),
        ],
        images: &[(
            "https://images.driftwear.dev/driftwood-hoodie-front.jpg",
            "Driftwood Hoodie, front",
        )],
    },
    SeedProduct {
        name: "Point Break Boardshorts",
        slug: "point-break-boardshorts",
        description: "18 inch outseam, four-way stretch, zip pocket that actually seals.",
        price: "52.00",
        stock: 80,
        featured: false,
        category_slug: "boardshorts",
        sizes: &[("30", 20), ("32", 20), ("34", 20), ("36", 20)],
        colors: &[("Navy", 40), ("Seafoam", 40)],
        variants: &[],
        images: &[(
            "https://images.driftwear.dev/point-break-boardshorts.jpg",
            "Point Break Boardshorts",
        )],
    },
    SeedProduct {
        name: "Tidal Cap",
        slug: "tidal-cap",
        description: "Unstructured five-panel cap with an embroidered wave.",
        price: "28.00",
        stock: 45,
        featured: false,
        category_slug: "accessories",
        sizes: &[],
        colors: &[("Olive", 25), ("Black", 20)],
        variants: &[],
        images: &[(
            "https://images.driftwear.dev/tidal-cap.jpg",
            "Tidal Cap",
        )],
    },
    SeedProduct {
        name: "Canvas Tote",
        slug: "canvas-tote",
        description: "12oz canvas, flat bottom, fits a wetsuit and a six-pack.",
        price: "18.00",
        stock: 200,
        featured: false,
        category_slug: "accessories",
        sizes: &[],
        colors: &[],
        variants: &[],
        images: &[(
            "https://images.driftwear.dev/canvas-tote.jpg",
            "Canvas Tote",
        )],
    },
    SeedProduct {
        name: "Longshore Crewneck",
        slug: "longshore-crewneck",
        description: "Mid-season crewneck, currently between production runs.",
        price: "58.00",
        stock: 0,
        featured: false,
        category_slug: "hoodies",
        sizes: &[("M", 0), ("L", 0)],
        colors: &[],
        variants: &[],
        images: &[],
    },
];

const REVIEWS: &[SeedReview] = &[
    SeedReview {
        product_slug: "classic-logo-tee",
        rating: 5,
        comment: "Holds its shape after a summer of washes. Runs slightly long.",
    },
    SeedReview {
        product_slug: "driftwood-hoodie",
        rating: 4,
        comment: "Warm enough for dawn patrol. Wish the pocket were deeper.",
    },
];

const DEMO_CUSTOMER_EMAIL: &str = "demo@driftwear.dev";
const DEMO_ADMIN_EMAIL: &str = "admin@driftwear.dev";

/// Seed the database with demo data. Safe to re-run.
///
/// # Errors
///
/// Returns `SeedError` if the database URL is missing or any insert
/// fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url().map_err(SeedError::MissingEnvVar)?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    for category in CATEGORIES {
        seed_category(&pool, category).await?;
    }
    tracing::info!("Seeded {} categories", CATEGORIES.len());

    for product in PRODUCTS {
        seed_product(&pool, product).await?;
    }
    tracing::info!("Seeded {} products", PRODUCTS.len());

    let customer_id = seed_user(
        &pool,
        DEMO_CUSTOMER_EMAIL,
        "Demo Customer",
        "password123",
        UserRole::Customer,
    )
    .await?;
    seed_user(
        &pool,
        DEMO_ADMIN_EMAIL,
        "Store Admin",
        "driftwear-admin",
        UserRole::Admin,
    )
    .await?;
    tracing::info!(
        "Seeded demo accounts: {} / {} (development passwords, change in production)",
        DEMO_CUSTOMER_EMAIL,
        DEMO_ADMIN_EMAIL
    );

    for review in REVIEWS {
        seed_review(&pool, customer_id, review).await?;
    }
    tracing::info!("Seeded {} reviews", REVIEWS.len());

    tracing::info!("Seeding complete!");
    Ok(())
}

/// Insert a category, returning its id whether fresh or pre-existing.
async fn seed_category(pool: &PgPool, category: &SeedCategory) -> Result<CategoryId, SeedError> {
    let inserted = sqlx::query_scalar::<_, CategoryId>(
        "INSERT INTO categories (name, slug, description) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (slug) DO NOTHING \
         RETURNING id",
    )
    .bind(category.name)
    .bind(category.slug)
    .bind(category.description)
    .fetch_optional(pool)
    .await?;

    if let Some(id) = inserted {
        return Ok(id);
    }

    let id = sqlx::query_scalar::<_, CategoryId>("SELECT id FROM categories WHERE slug = $1")
        .bind(category.slug)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

/// Insert a product and its satellite rows.
async fn seed_product(pool: &PgPool, product: &SeedProduct) -> Result<(), SeedError> {
    let price = Price::parse(product.price)?;
    let category_id =
        sqlx::query_scalar::<_, CategoryId>("SELECT id FROM categories WHERE slug = $1")
            .bind(product.category_slug)
            .fetch_one(pool)
            .await?;

    let inserted = sqlx::query_scalar::<_, ProductId>(
        "INSERT INTO products (name, slug, description, price, stock, featured, category_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (slug) DO NOTHING \
         RETURNING id",
    )
    .bind(product.name)
    .bind(product.slug)
    .bind(product.description)
    .bind(price)
    .bind(product.stock)
    .bind(product.featured)
    .bind(category_id)
    .fetch_optional(pool)
    .await?;

    let product_id = match inserted {
        Some(id) => id,
        None => {
            sqlx::query_scalar::<_, ProductId>("SELECT id FROM products WHERE slug = $1")
                .bind(product.slug)
                .fetch_one(pool)
                .await?
        }
    };

    for (size, stock) in product.sizes {
        sqlx::query(
            "INSERT INTO product_sizes (product_id, size, stock) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (product_id, size) DO NOTHING",
        )
        .bind(product_id)
        .bind(size)
        .bind(stock)
        .execute(pool)
        .await?;
    }

    for (color, stock) in product.colors {
        sqlx::query(
            "INSERT INTO product_colors (product_id, color, stock) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (product_id, color) DO NOTHING",
        )
        .bind(product_id)
        .bind(color)
        .bind(stock)
        .execute(pool)
        .await?;
    }

    for (sku, size, color, stock) in product.variants {
        sqlx::query(
            "INSERT INTO product_variants (product_id, sku, size, color, stock) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (sku) DO NOTHING",
        )
        .bind(product_id)
        .bind(sku)
        .bind(size)
        .bind(color)
        .bind(stock)
        .execute(pool)
        .await?;
    }

    for (position, (url, alt)) in product.images.iter().enumerate() {
        // Images have no natural key; match on (product, url) by hand.
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM product_images WHERE product_id = $1 AND url = $2",
        )
        .bind(product_id)
        .bind(url)
        .fetch_one(pool)
        .await?;

        if exists == 0 {
            sqlx::query(
                "INSERT INTO product_images (product_id, url, alt, position) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(product_id)
            .bind(url)
            .bind(alt)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}

/// Insert a user, returning their id whether fresh or pre-existing.
async fn seed_user(
    pool: &PgPool,
    email: &str,
    name: &str,
    password: &str,
    role: UserRole,
) -> Result<UserId, SeedError> {
    // Seed emails are compile-time constants; parse guards against typos.
    let email =
        Email::parse(email).map_err(|e| SeedError::InvalidSeedData(e.to_string()))?;
    let password_hash = hash_password(password).map_err(|_| SeedError::Hash)?;

    let inserted = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (email, password_hash, name, role) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (email) DO NOTHING \
         RETURNING id",
    )
    .bind(email.as_str())
    .bind(&password_hash)
    .bind(name)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    if let Some(id) = inserted {
        return Ok(id);
    }

    let id = sqlx::query_scalar::<_, UserId>("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_one(pool)
        .await?;
    Ok(id)
}

/// Insert a review from the demo customer.
async fn seed_review(pool: &PgPool, user_id: UserId, review: &SeedReview) -> Result<(), SeedError> {
    let product_id = sqlx::query_scalar::<_, ProductId>("SELECT id FROM products WHERE slug = $1")
        .bind(review.product_slug)
        .fetch_one(pool)
        .await?;

    sqlx::query(
        "INSERT INTO reviews (product_id, user_id, rating, comment) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (product_id, user_id) DO NOTHING",
    )
    .bind(product_id)
    .bind(user_id)
    .bind(review.rating)
    .bind(review.comment)
    .execute(pool)
    .await?;

    Ok(())
}
