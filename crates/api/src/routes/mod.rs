//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (DB ping)
//!
//! # Catalog (public)
//! GET  /api/products             - Product listing (category, featured, q, limit)
//! GET  /api/products/{slug}      - Product detail
//! GET  /api/categories           - Categories with product counts
//! GET  /api/search               - Search by name/description (q, limit)
//!
//! # Cart (requires auth)
//! GET    /api/cart               - Current user's cart with subtotal
//! POST   /api/cart               - Add item (merges on product/size/color)
//! PUT    /api/cart               - Set item quantity
//! DELETE /api/cart               - Remove item (?item_id=) or clear
//!
//! # Checkout (requires auth)
//! POST  /api/checkout            - Checkout transaction
//! GET   /api/checkout            - Order history, or one order (?order_id=)
//! POST  /api/checkout/inventory  - Batch availability report
//! GET   /api/checkout/inventory  - Single-item availability report
//! GET   /api/checkout/orders     - Order history
//! PATCH /api/checkout/orders     - Order status update (admin only)
//!
//! # Auth
//! POST /api/auth/register        - Create account, returns token
//! POST /api/auth/login           - Issue token
//! POST /api/auth/logout          - Acknowledge logout
//! POST /api/auth/forgot-password - Start password reset
//! POST /api/auth/reset-password  - Redeem reset token
//!
//! # Admin (requires auth, role ADMIN)
//! GET   /api/admin/dashboard     - Overview counts, revenue, panels
//! GET   /api/admin/orders        - All orders (status, limit)
//! GET   /api/admin/orders/{id}   - Order detail with customer email
//! PATCH /api/admin/orders/{id}   - Order status update
//! GET   /api/admin/products      - Product listing (back-office view)
//! POST  /api/admin/products      - Create product
//! GET/PUT/DELETE /api/admin/products/{id}
//! POST/PUT/DELETE /api/admin/products/{id}/sizes[/{size_id}]
//! POST/PUT/DELETE /api/admin/products/{id}/colors[/{color_id}]
//! POST/PUT/DELETE /api/admin/products/{id}/variants[/{variant_id}]
//! POST/DELETE     /api/admin/products/{id}/images[/{image_id}]
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(cart::show)
            .post(cart::add)
            .put(cart::update)
            .delete(cart::remove),
    )
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::checkout).get(checkout::history))
        .route(
            "/inventory",
            post(checkout::check_inventory).get(checkout::check_inventory_item),
        )
        .route(
            "/orders",
            get(checkout::orders).patch(checkout::update_order_status),
        )
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
}

/// Create all `/api` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .route("/api/categories", get(categories::list))
        .route("/api/search", get(search::search))
        .nest("/api/cart", cart_routes())
        .nest("/api/checkout", checkout_routes())
        .nest("/api/auth", auth_routes())
        .nest("/api/admin", admin::router())
}
