//! Back-office route handlers.
//!
//! Every handler here takes the [`RequireAdmin`](crate::middleware::RequireAdmin)
//! extractor; non-admin callers are rejected with 401 before the handler
//! body runs.

pub mod dashboard;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Build the `/api/admin` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/orders", get(orders::list))
        .route(
            "/orders/{id}",
            get(orders::show).patch(orders::update_status),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/products/{id}/sizes", post(products::create_size))
        .route(
            "/products/{id}/sizes/{size_id}",
            put(products::update_size).delete(products::delete_size),
        )
        .route("/products/{id}/colors", post(products::create_color))
        .route(
            "/products/{id}/colors/{color_id}",
            put(products::update_color).delete(products::delete_color),
        )
        .route("/products/{id}/variants", post(products::create_variant))
        .route(
            "/products/{id}/variants/{variant_id}",
            put(products::update_variant).delete(products::delete_variant),
        )
        .route("/products/{id}/images", post(products::create_image))
        .route(
            "/products/{id}/images/{image_id}",
            axum::routing::delete(products::delete_image),
        )
}
