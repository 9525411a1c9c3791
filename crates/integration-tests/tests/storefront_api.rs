//! Integration tests for the storefront's surrounding API surface:
//! health checks, request validation errors, analytics, and products.
//!
//! These tests require a running storefront server; see
//! `tests/abandonment_lifecycle.rs` for setup.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

fn base_url() -> String {
    std::env::var("NAVONA_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

async fn db_pool() -> PgPool {
    dotenvy::dotenv().ok();
    let url = std::env::var("NAVONA_DATABASE_URL").expect("NAVONA_DATABASE_URL not set");
    PgPool::connect(&url).await.expect("Failed to connect to database")
}

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health_endpoints() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to reach health endpoint");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");

    let resp = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Validation Error Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_record_abandonment_validation_messages() {
    let client = Client::new();

    // Missing store ID
    let resp = client
        .post(format!("{}/abandonment-events", base_url()))
        .json(&json!({
            "sessionId": "sess1",
            "triggerType": "IDLE",
            "items": [{ "id": Uuid::new_v4().to_string(), "name": "x", "price": 1.0, "quantity": 1 }],
        }))
        .send()
        .await
        .expect("Failed to post event");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["accepted"], false);
    assert_eq!(body["error"], "store ID is required");

    // Unknown trigger
    let resp = client
        .post(format!("{}/abandonment-events", base_url()))
        .json(&json!({
            "storeId": Uuid::new_v4().to_string(),
            "sessionId": "sess1",
            "triggerType": "MOUSE_WIGGLE",
            "items": [{ "id": Uuid::new_v4().to_string(), "name": "x", "price": 1.0, "quantity": 1 }],
        }))
        .send()
        .await
        .expect("Failed to post event");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["error"], "unknown trigger type: MOUSE_WIGGLE");

    // Fractional quantity
    let resp = client
        .post(format!("{}/abandonment-events", base_url()))
        .json(&json!({
            "storeId": Uuid::new_v4().to_string(),
            "sessionId": "sess1",
            "triggerType": "IDLE",
            "items": [{ "id": Uuid::new_v4().to_string(), "name": "x", "price": 1.0, "quantity": 1.5 }],
        }))
        .send()
        .await
        .expect("Failed to post event");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["error"], "Quantity must be an integer");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_record_abandonment_unknown_store_is_404() {
    let client = Client::new();

    let resp = client
        .post(format!("{}/abandonment-events", base_url()))
        .json(&json!({
            "storeId": Uuid::new_v4().to_string(),
            "sessionId": "sess1",
            "triggerType": "IDLE",
            "items": [{ "id": Uuid::new_v4().to_string(), "name": "x", "price": 1.0, "quantity": 1 }],
        }))
        .send()
        .await
        .expect("Failed to post event");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["accepted"], false);
    assert_eq!(body["error"], "Store not found");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_validate_unknown_coupon_is_undifferentiated() {
    let client = Client::new();
    let pool = db_pool().await;
    let (store_id,): (Uuid,) =
        sqlx::query_as("SELECT id FROM storefront.store ORDER BY created_at LIMIT 1")
            .fetch_one(&pool)
            .await
            .expect("seeded store missing");

    let resp = client
        .post(format!("{}/coupons/validate", base_url()))
        .json(&json!({
            "storeId": store_id.to_string(),
            "sessionId": "no-such-session",
            "code": "SALE-ZZZZZ",
        }))
        .send()
        .await
        .expect("Failed to validate coupon");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["accepted"], false);
    assert_eq!(body["error"], "Coupon is invalid or expired");
}

// ============================================================================
// Analytics & Products Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_analytics_shape() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/analytics", base_url()))
        .send()
        .await
        .expect("Failed to get analytics");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("body");

    assert_eq!(body["success"], true);
    let analytics = &body["analytics"];
    assert!(analytics["totalEvents"].is_i64());
    assert!(analytics["acceptedCoupons"].is_i64());
    assert!(analytics["completedCheckouts"].is_i64());
    assert!(analytics["conversionRate"].is_number());
    assert!(analytics["acceptanceRate"].is_number());
    for key in ["CURSOR_LEAVE", "IDLE", "SCROLLUP_FAST"] {
        assert!(analytics["triggerBreakdown"][key].is_i64(), "missing {key}");
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_product_get_and_coupon_toggle() {
    let client = Client::new();
    let pool = db_pool().await;
    let (product_id, was_eligible): (Uuid, bool) = sqlx::query_as(
        "SELECT id, is_accept_coupon FROM storefront.product ORDER BY name LIMIT 1",
    )
    .fetch_one(&pool)
    .await
    .expect("seeded product missing");

    let resp = client
        .get(format!("{}/products/{product_id}", base_url()))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["id"].as_str(), Some(product_id.to_string().as_str()));

    // Toggle eligibility and restore it.
    let resp = client
        .put(format!("{}/products/{product_id}", base_url()))
        .json(&json!({ "isAcceptCoupon": !was_eligible }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(body["product"]["isAcceptCoupon"], !was_eligible);

    let resp = client
        .put(format!("{}/products/{product_id}", base_url()))
        .json(&json!({ "isAcceptCoupon": was_eligible }))
        .send()
        .await
        .expect("Failed to restore product");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_unknown_product_is_404() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/products/{}", base_url(), Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["error"], "Product not found");
}
