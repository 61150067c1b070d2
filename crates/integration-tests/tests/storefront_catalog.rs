//! Integration tests for the public catalog endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - Seed data loaded (cargo run -p driftwear-cli -- seed)
//! - The API server running (cargo run -p driftwear-api)
//!
//! Run with: cargo test -p driftwear-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;
use uuid::Uuid;

/// Base URL for the API server (configurable via environment).
fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_health_endpoints() {
    let client = Client::new();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach health endpoint");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Product Listing Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_product_listing_returns_summaries() {
    let client = Client::new();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Value> = resp.json().await.expect("Failed to parse product list");
    assert!(!products.is_empty(), "seed data should include products");

    for product in &products {
        assert!(product["name"].is_string());
        assert!(product["slug"].is_string());
        // Prices travel as decimal strings, never floats
        assert!(product["price"].is_string());
        assert!(product["stock"].is_number());
    }
}

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_featured_filter() {
    let client = Client::new();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/products?featured=true"))
        .send()
        .await
        .expect("Failed to list featured products");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Value> = resp.json().await.expect("Failed to parse product list");
    for product in &products {
        assert_eq!(product["featured"], Value::Bool(true));
    }
}

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_category_filter() {
    let client = Client::new();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/categories"))
        .send()
        .await
        .expect("Failed to list categories");
    assert_eq!(resp.status(), StatusCode::OK);

    let categories: Vec<Value> = resp.json().await.expect("Failed to parse categories");
    assert!(!categories.is_empty(), "seed data should include categories");
    for category in &categories {
        assert!(category["slug"].is_string());
        assert!(category["product_count"].is_number());
    }

    // Filtering by the first category only returns products from it
    let slug = categories[0]["slug"].as_str().expect("category slug");
    let resp = client
        .get(format!("{base_url}/api/products?category={slug}"))
        .send()
        .await
        .expect("Failed to list products by category");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Value> = resp.json().await.expect("Failed to parse product list");
    for product in &products {
        assert_eq!(product["category_slug"].as_str(), Some(slug));
    }
}

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_oversized_limit_is_clamped() {
    let client = Client::new();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/products?limit=100000"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Value> = resp.json().await.expect("Failed to parse product list");
    assert!(products.len() <= 200);
}

// ============================================================================
// Product Detail Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_product_detail_by_slug() {
    let client = Client::new();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products");
    let products: Vec<Value> = resp.json().await.expect("Failed to parse product list");
    let slug = products[0]["slug"].as_str().expect("product slug");

    let resp = client
        .get(format!("{base_url}/api/products/{slug}"))
        .send()
        .await
        .expect("Failed to fetch product detail");
    assert_eq!(resp.status(), StatusCode::OK);

    let detail: Value = resp.json().await.expect("Failed to parse product detail");
    assert_eq!(detail["slug"].as_str(), Some(slug));
    assert!(detail["sizes"].is_array());
    assert!(detail["colors"].is_array());
    assert!(detail["variants"].is_array());
    assert!(detail["images"].is_array());
    assert!(detail["reviews"].is_array());
}

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_unknown_slug_returns_404() {
    let client = Client::new();
    let base_url = api_base_url();

    let missing = format!("no-such-product-{}", Uuid::new_v4());
    let resp = client
        .get(format!("{base_url}/api/products/{missing}"))
        .send()
        .await
        .expect("Failed to fetch product detail");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(
        body["error"]
            .as_str()
            .expect("error message")
            .contains("not found")
    );
}

// ============================================================================
// Search Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_search_requires_query() {
    let client = Client::new();
    let base_url = api_base_url();

    for url in [
        format!("{base_url}/api/search"),
        format!("{base_url}/api/search?q=%20%20"),
    ] {
        let resp = client.get(url).send().await.expect("Failed to search");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = resp.json().await.expect("Failed to parse error body");
        assert_eq!(body["error"].as_str(), Some("Search query is required"));
    }
}

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_search_echoes_query_and_matches() {
    let client = Client::new();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/search?q=tee"))
        .send()
        .await
        .expect("Failed to search");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse search response");
    assert_eq!(body["query"].as_str(), Some("tee"));
    assert!(body["results"].is_array());
}
