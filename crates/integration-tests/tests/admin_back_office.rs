//! Integration tests for the admin back office.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - Seed data loaded (the seeded admin account is used to authenticate)
//! - The API server running (cargo run -p driftwear-api)
//!
//! Run with: cargo test -p driftwear-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API server (configurable via environment).
fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Credentials for the seeded admin account (override via environment).
fn admin_credentials() -> (String, String) {
    (
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@driftwear.dev".to_string()),
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "driftwear-admin".to_string()),
    )
}

/// Log in as the seeded admin and return a bearer token.
async fn admin_token(client: &Client) -> String {
    let base_url = api_base_url();
    let (email, password) = admin_credentials();
    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to log in as admin");
    assert_eq!(resp.status(), StatusCode::OK, "admin login failed; is the database seeded?");

    let body: Value = resp.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("token missing").to_string()
}

/// Create a product via the admin API and return its JSON body.
async fn create_product(client: &Client, admin: &str, name: &str) -> Value {
    let base_url = api_base_url();
    let resp = client
        .post(format!("{base_url}/api/admin/products"))
        .bearer_auth(admin)
        .json(&json!({
            "name": name,
            "description": "Created by integration tests",
            "price": "35.00",
            "stock": 8,
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse product response")
}

// ============================================================================
// Dashboard Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_dashboard_reports_counts_and_revenue() {
    let client = Client::new();
    let base_url = api_base_url();
    let admin = admin_token(&client).await;

    let resp = client
        .get(format!("{base_url}/api/admin/dashboard"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to fetch dashboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse dashboard");
    assert!(body["total_products"].as_i64().expect("total_products") >= 1);
    assert!(body["total_users"].as_i64().expect("total_users") >= 1);
    assert!(body["revenue"].is_string());
    assert!(body["orders_by_status"].is_array());
    assert!(body["low_stock_products"].is_array());
    assert!(body["recent_orders"].is_array());
}

// ============================================================================
// Product CRUD Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_product_create_generates_slug() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let suffix = Uuid::new_v4();
    let product = create_product(&client, &admin, &format!("Reef Walker Sandal {suffix}")).await;

    let slug = product["slug"].as_str().expect("slug");
    assert!(
        slug.starts_with("reef-walker-sandal"),
        "slug was {slug}"
    );
    assert_eq!(product["featured"], Value::Bool(false));
    assert_eq!(product["price"].as_str(), Some("35.00"));
}

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_product_create_validates_fields() {
    let client = Client::new();
    let base_url = api_base_url();
    let admin = admin_token(&client).await;

    // Blank name
    let resp = client
        .post(format!("{base_url}/api/admin/products"))
        .bearer_auth(&admin)
        .json(&json!({"name": "   ", "price": "10.00"}))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"].as_str(), Some("name must not be empty"));

    // Negative stock
    let resp = client
        .post(format!("{base_url}/api/admin/products"))
        .bearer_auth(&admin)
        .json(&json!({"name": "Probe", "price": "10.00", "stock": -1}))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"].as_str(), Some("stock must not be negative"));

    // Negative price is rejected during deserialization
    let resp = client
        .post(format!("{base_url}/api/admin/products"))
        .bearer_auth(&admin)
        .json(&json!({"name": "Probe", "price": "-10.00"}))
        .send()
        .await
        .expect("Failed to create product");
    assert!(resp.status().is_client_error());

    // Unknown category is a 400, not a foreign-key failure
    let resp = client
        .post(format!("{base_url}/api/admin/products"))
        .bearer_auth(&admin)
        .json(&json!({"name": "Probe", "price": "10.00", "category_id": 999_999_999}))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(
        body["error"].as_str(),
        Some("category 999999999 does not exist")
    );
}

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_product_update_regenerates_slug_from_name() {
    let client = Client::new();
    let base_url = api_base_url();
    let admin = admin_token(&client).await;

    let suffix = Uuid::new_v4();
    let product = create_product(&client, &admin, &format!("Dune Jacket {suffix}")).await;
    let id = product["id"].as_i64().expect("id");

    // Renaming without an explicit slug regenerates it from the new name
    let resp = client
        .put(format!("{base_url}/api/admin/products/{id}"))
        .bearer_auth(&admin)
        .json(&json!({"name": format!("Storm Jacket {suffix}")}))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse product");
    assert!(
        updated["slug"]
            .as_str()
            .expect("slug")
            .starts_with("storm-jacket")
    );

    // An explicit slug wins over regeneration
    let resp = client
        .put(format!("{base_url}/api/admin/products/{id}"))
        .bearer_auth(&admin)
        .json(&json!({
            "name": format!("Gale Jacket {suffix}"),
            "slug": format!("hand-picked-{suffix}"),
        }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(
        updated["slug"].as_str(),
        Some(format!("hand-picked-{suffix}").as_str())
    );
}

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_product_delete() {
    let client = Client::new();
    let base_url = api_base_url();
    let admin = admin_token(&client).await;

    let product = create_product(&client, &admin, &format!("Ephemeral {}", Uuid::new_v4())).await;
    let id = product["id"].as_i64().expect("id");

    let resp = client
        .delete(format!("{base_url}/api/admin/products/{id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/admin/products/{id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Deleting again is a 404, not an error
    let resp = client
        .delete(format!("{base_url}/api/admin/products/{id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Size, Color, Variant and Image Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_size_and_color_management() {
    let client = Client::new();
    let base_url = api_base_url();
    let admin = admin_token(&client).await;

    let product = create_product(&client, &admin, &format!("Sized Tee {}", Uuid::new_v4())).await;
    let id = product["id"].as_i64().expect("id");

    // Add a size counter
    let resp = client
        .post(format!("{base_url}/api/admin/products/{id}/sizes"))
        .bearer_auth(&admin)
        .json(&json!({"size": "M", "stock": 4}))
        .send()
        .await
        .expect("Failed to add size");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let size: Value = resp.json().await.expect("Failed to parse size");
    let size_id = size["id"].as_i64().expect("size id");
    assert_eq!(size["stock"].as_i64(), Some(4));

    // Restock it
    let resp = client
        .put(format!("{base_url}/api/admin/products/{id}/sizes/{size_id}"))
        .bearer_auth(&admin)
        .json(&json!({"stock": 9}))
        .send()
        .await
        .expect("Failed to update size");
    assert_eq!(resp.status(), StatusCode::OK);
    let size: Value = resp.json().await.expect("Failed to parse size");
    assert_eq!(size["stock"].as_i64(), Some(9));
    assert_eq!(size["size"].as_str(), Some("M"));

    // Colors behave the same way
    let resp = client
        .post(format!("{base_url}/api/admin/products/{id}/colors"))
        .bearer_auth(&admin)
        .json(&json!({"color": "Kelp", "stock": 3}))
        .send()
        .await
        .expect("Failed to add color");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let color: Value = resp.json().await.expect("Failed to parse color");
    let color_id = color["id"].as_i64().expect("color id");

    // The detail view lists both
    let resp = client
        .get(format!("{base_url}/api/admin/products/{id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to fetch product");
    let detail: Value = resp.json().await.expect("Failed to parse detail");
    assert_eq!(detail["sizes"].as_array().expect("sizes").len(), 1);
    assert_eq!(detail["colors"].as_array().expect("colors").len(), 1);

    // Remove them
    let resp = client
        .delete(format!("{base_url}/api/admin/products/{id}/sizes/{size_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to delete size");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = client
        .delete(format!("{base_url}/api/admin/products/{id}/colors/{color_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to delete color");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_variant_management() {
    let client = Client::new();
    let base_url = api_base_url();
    let admin = admin_token(&client).await;

    let product = create_product(&client, &admin, &format!("Variant Tee {}", Uuid::new_v4())).await;
    let id = product["id"].as_i64().expect("id");

    let sku = format!("VT-{}", Uuid::new_v4());
    let resp = client
        .post(format!("{base_url}/api/admin/products/{id}/variants"))
        .bearer_auth(&admin)
        .json(&json!({
            "sku": sku,
            "size": "M",
            "color": "Kelp",
            "stock": 5,
            "price_override": "39.00",
        }))
        .send()
        .await
        .expect("Failed to add variant");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let variant: Value = resp.json().await.expect("Failed to parse variant");
    let variant_id = variant["id"].as_i64().expect("variant id");
    assert_eq!(variant["price_override"].as_str(), Some("39.00"));

    // A second variant with the same SKU is rejected
    let resp = client
        .post(format!("{base_url}/api/admin/products/{id}/variants"))
        .bearer_auth(&admin)
        .json(&json!({"sku": sku, "size": "L", "color": "Kelp", "stock": 2}))
        .send()
        .await
        .expect("Failed to add variant");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Explicit null clears the override; absent fields stay untouched
    let resp = client
        .put(format!(
            "{base_url}/api/admin/products/{id}/variants/{variant_id}"
        ))
        .bearer_auth(&admin)
        .json(&json!({"price_override": null, "stock": 7}))
        .send()
        .await
        .expect("Failed to update variant");
    assert_eq!(resp.status(), StatusCode::OK);
    let variant: Value = resp.json().await.expect("Failed to parse variant");
    assert!(variant["price_override"].is_null());
    assert_eq!(variant["stock"].as_i64(), Some(7));
    assert_eq!(variant["sku"].as_str(), Some(sku.as_str()));

    let resp = client
        .delete(format!(
            "{base_url}/api/admin/products/{id}/variants/{variant_id}"
        ))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to delete variant");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_image_management() {
    let client = Client::new();
    let base_url = api_base_url();
    let admin = admin_token(&client).await;

    let product = create_product(&client, &admin, &format!("Pictured Tee {}", Uuid::new_v4())).await;
    let id = product["id"].as_i64().expect("id");

    let resp = client
        .post(format!("{base_url}/api/admin/products/{id}/images"))
        .bearer_auth(&admin)
        .json(&json!({
            "url": "https://cdn.driftwear.dev/test/front.jpg",
            "alt": "Front view",
            "position": 0,
        }))
        .send()
        .await
        .expect("Failed to add image");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let image: Value = resp.json().await.expect("Failed to parse image");
    let image_id = image["id"].as_i64().expect("image id");

    let resp = client
        .get(format!("{base_url}/api/admin/products/{id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to fetch product");
    let detail: Value = resp.json().await.expect("Failed to parse detail");
    assert_eq!(detail["images"].as_array().expect("images").len(), 1);

    let resp = client
        .delete(format!("{base_url}/api/admin/products/{id}/images/{image_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to delete image");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

// ============================================================================
// Order Management Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running driftwear-api server"]
async fn test_order_status_lifecycle() {
    let client = Client::new();
    let base_url = api_base_url();
    let admin = admin_token(&client).await;

    // Place an order as a fresh customer
    let email = format!("integration-test-{}@example.com", Uuid::new_v4());
    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({"email": email, "password": "integration-pass"}))
        .send()
        .await
        .expect("Failed to register");
    let body: Value = resp.json().await.expect("Failed to parse register response");
    let customer = body["token"].as_str().expect("token").to_string();

    let product = create_product(&client, &admin, &format!("Ordered Tee {}", Uuid::new_v4())).await;
    let resp = client
        .post(format!("{base_url}/api/checkout"))
        .bearer_auth(&customer)
        .json(&json!({
            "items": [{"product_id": product["id"], "quantity": 1}],
            "shipping_address": {
                "street": "42 Shore Drive",
                "city": "Santa Cruz",
                "state": "CA",
                "zip": "95060",
                "country": "US",
            },
        }))
        .send()
        .await
        .expect("Failed to check out");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_i64().expect("order id");

    // It shows up in the paid listing
    let resp = client
        .get(format!("{base_url}/api/admin/orders?status=PAID"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::OK);
    let orders: Vec<Value> = resp.json().await.expect("Failed to parse orders");
    assert!(orders.iter().any(|o| o["id"].as_i64() == Some(order_id)));

    // Advance it to SHIPPED
    let resp = client
        .patch(format!("{base_url}/api/admin/orders/{order_id}"))
        .bearer_auth(&admin)
        .json(&json!({"status": "SHIPPED"}))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(updated["status"].as_str(), Some("SHIPPED"));

    // The back-office detail includes the customer's email
    let resp = client
        .get(format!("{base_url}/api/admin/orders/{order_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to fetch order");
    assert_eq!(resp.status(), StatusCode::OK);
    let detail: Value = resp.json().await.expect("Failed to parse order detail");
    assert_eq!(detail["user_email"].as_str(), Some(email.as_str()));
    assert_eq!(detail["status"].as_str(), Some("SHIPPED"));

    // An unknown status value never reaches the handler
    let resp = client
        .patch(format!("{base_url}/api/admin/orders/{order_id}"))
        .bearer_auth(&admin)
        .json(&json!({"status": "TELEPORTED"}))
        .send()
        .await
        .expect("Failed to update status");
    assert!(resp.status().is_client_error());

    // The customer sees the new status in their history
    let resp = client
        .get(format!("{base_url}/api/checkout?order_id={order_id}"))
        .bearer_auth(&customer)
        .send()
        .await
        .expect("Failed to fetch order detail");
    let detail: Value = resp.json().await.expect("Failed to parse order detail");
    assert_eq!(detail["status"].as_str(), Some("SHIPPED"));
}
