//! Integration tests for the abandonment lifecycle.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed data applied
//!   (cargo run -p navona-cli -- migrate && cargo run -p navona-cli -- seed)
//! - The storefront server running (cargo run -p navona-storefront)
//!
//! Run with: cargo test -p navona-integration-tests -- --ignored

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

/// Base URL for the storefront API (configurable via environment).
fn base_url() -> String {
    std::env::var("NAVONA_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

async fn db_pool() -> PgPool {
    dotenvy::dotenv().ok();
    let url = std::env::var("NAVONA_DATABASE_URL").expect("NAVONA_DATABASE_URL not set");
    PgPool::connect(&url).await.expect("Failed to connect to database")
}

/// Look up the seeded store and one coupon-eligible product.
async fn seeded_store_and_product(pool: &PgPool) -> (Uuid, Uuid, String, Decimal) {
    let (store_id,): (Uuid,) =
        sqlx::query_as("SELECT id FROM storefront.store ORDER BY created_at LIMIT 1")
            .fetch_one(pool)
            .await
            .expect("seeded store missing");

    let (product_id, name, price): (Uuid, String, Decimal) = sqlx::query_as(
        "SELECT id, name, price FROM storefront.product
         WHERE store_id = $1 AND is_accept_coupon = true
         ORDER BY name LIMIT 1",
    )
    .bind(store_id)
    .fetch_one(pool)
    .await
    .expect("seeded product missing");

    (store_id, product_id, name, price)
}

fn fresh_session() -> String {
    format!("it-session-{}", Uuid::new_v4())
}

async fn record_abandonment(
    client: &Client,
    store_id: Uuid,
    session_id: &str,
    product_id: Uuid,
    name: &str,
    price: &Decimal,
) -> Value {
    let resp = client
        .post(format!("{}/abandonment-events", base_url()))
        .json(&json!({
            "storeId": store_id.to_string(),
            "sessionId": session_id,
            "triggerType": "CURSOR_LEAVE",
            "items": [{
                "id": product_id.to_string(),
                "name": name,
                "price": price,
                "quantity": 2,
            }],
        }))
        .send()
        .await
        .expect("Failed to record abandonment");

    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse response")
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_record_validate_redeem_lifecycle() {
    let client = Client::new();
    let pool = db_pool().await;
    let (store_id, product_id, name, price) = seeded_store_and_product(&pool).await;
    let session_id = fresh_session();

    // 1. Record an abandonment; a coupon is issued atomically with it.
    let recorded =
        record_abandonment(&client, store_id, &session_id, product_id, &name, &price).await;
    assert_eq!(recorded["accepted"], true);
    assert_eq!(recorded["message"], "Event Created Successfully!");
    assert_eq!(recorded["coupon"]["isRedeemed"], false);
    assert_eq!(recorded["abandonmentEvent"]["isAccepted"], false);

    let issued: DateTime<Utc> = recorded["coupon"]["createdAt"]
        .as_str()
        .expect("coupon createdAt missing")
        .parse()
        .expect("createdAt not a timestamp");
    let expires: DateTime<Utc> = recorded["coupon"]["expiresAt"]
        .as_str()
        .expect("coupon expiresAt missing")
        .parse()
        .expect("expiresAt not a timestamp");
    assert_eq!(expires - issued, Duration::hours(24));

    let code = recorded["coupon"]["code"]
        .as_str()
        .expect("coupon code missing")
        .to_owned();
    let coupon_id = recorded["coupon"]["id"]
        .as_str()
        .expect("coupon id missing")
        .to_owned();
    assert!(code.starts_with("SALE-"));

    // 2. Validate the coupon for a discount preview.
    let resp = client
        .post(format!("{}/coupons/validate", base_url()))
        .json(&json!({
            "storeId": store_id.to_string(),
            "sessionId": session_id,
            "code": code,
        }))
        .send()
        .await
        .expect("Failed to validate coupon");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Coupon applied successfully");
    assert_eq!(body["coupon"]["id"].as_str(), Some(coupon_id.as_str()));

    // 3. Place the order with the coupon; the server prices the lines and
    //    applies the discount.
    let resp = client
        .post(format!("{}/orders", base_url()))
        .json(&json!({
            "sessionId": session_id,
            "customerEmail": "buyer@example.com",
            "customerName": "Integration Buyer",
            "items": [{ "productId": product_id.to_string(), "quantity": 2 }],
            "couponId": coupon_id,
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Order created successfully!");
    assert_eq!(body["coupon"]["isRedeemed"], true);
    assert_eq!(body["abandonmentEvent"]["isAccepted"], true);
    assert_eq!(body["abandonmentEvent"]["isCheckoutCompleted"], true);

    let expected_total = (price * Decimal::from(2) * Decimal::new(90, 2))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total: Decimal = body["order"]["total"]
        .as_str()
        .map_or_else(
            || {
                Decimal::try_from(body["order"]["total"].as_f64().expect("total missing"))
                    .expect("total not a decimal")
            },
            |s| s.parse().expect("total not a decimal"),
        )
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    assert_eq!(total, expected_total);

    // 4. The coupon is single use: validating it again must fail.
    let resp = client
        .post(format!("{}/coupons/validate", base_url()))
        .json(&json!({
            "storeId": store_id.to_string(),
            "sessionId": session_id,
            "code": body["coupon"]["code"],
        }))
        .send()
        .await
        .expect("Failed to re-validate coupon");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["accepted"], false);
    assert_eq!(body["error"], "Coupon is invalid or expired");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_redeemed_coupon_cannot_buy_a_second_order() {
    let client = Client::new();
    let pool = db_pool().await;
    let (store_id, product_id, name, price) = seeded_store_and_product(&pool).await;
    let session_id = fresh_session();

    let recorded =
        record_abandonment(&client, store_id, &session_id, product_id, &name, &price).await;
    let coupon_id = recorded["coupon"]["id"]
        .as_str()
        .expect("coupon id missing")
        .to_owned();

    let order_body = json!({
        "sessionId": session_id,
        "customerEmail": "buyer@example.com",
        "customerName": "Integration Buyer",
        "items": [{ "productId": product_id.to_string(), "quantity": 1 }],
        "couponId": coupon_id,
    });

    // First placement redeems the coupon.
    let resp = client
        .post(format!("{}/orders", base_url()))
        .json(&order_body)
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);

    let orders_after_first: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM storefront.orders WHERE session_id = $1")
            .bind(&session_id)
            .fetch_one(&pool)
            .await
            .expect("Failed to count orders");
    assert_eq!(orders_after_first, 1);

    // A second placement with the same coupon must fail and must not
    // create another order.
    let resp = client
        .post(format!("{}/orders", base_url()))
        .json(&order_body)
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["accepted"], false);
    assert_eq!(body["error"], "Coupon is invalid or expired");

    let orders_after_second: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM storefront.orders WHERE session_id = $1")
            .bind(&session_id)
            .fetch_one(&pool)
            .await
            .expect("Failed to count orders");
    assert_eq!(orders_after_second, 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_invalid_item_ids_leave_no_rows_behind() {
    let client = Client::new();
    let pool = db_pool().await;
    let (store_id,): (Uuid,) =
        sqlx::query_as("SELECT id FROM storefront.store ORDER BY created_at LIMIT 1")
            .fetch_one(&pool)
            .await
            .expect("seeded store missing");
    let session_id = fresh_session();
    let unknown = Uuid::new_v4();

    let resp = client
        .post(format!("{}/abandonment-events", base_url()))
        .json(&json!({
            "storeId": store_id.to_string(),
            "sessionId": session_id,
            "triggerType": "IDLE",
            "items": [{
                "id": unknown.to_string(),
                "name": "ghost",
                "price": 9.99,
                "quantity": 1,
            }],
        }))
        .send()
        .await
        .expect("Failed to post event");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["accepted"], false);
    assert_eq!(
        body["error"],
        format!("Invalid item IDs: {unknown}")
    );

    // The rejection happens before any write: no coupon and no event may
    // exist for the session.
    let coupons: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM storefront.coupon WHERE session_id = $1")
            .bind(&session_id)
            .fetch_one(&pool)
            .await
            .expect("Failed to count coupons");
    assert_eq!(coupons, 0);

    let events: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM storefront.abandonment_event WHERE session_id = $1",
    )
    .bind(&session_id)
    .fetch_one(&pool)
    .await
    .expect("Failed to count events");
    assert_eq!(events, 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_order_without_coupon_charges_full_price() {
    let client = Client::new();
    let pool = db_pool().await;
    let (_, product_id, _, price) = seeded_store_and_product(&pool).await;

    let resp = client
        .post(format!("{}/orders", base_url()))
        .json(&json!({
            "sessionId": fresh_session(),
            "customerEmail": "buyer@example.com",
            "customerName": "Integration Buyer",
            "items": [{ "productId": product_id.to_string(), "quantity": 3 }],
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    assert!(body["coupon"].is_null());
    assert!(body["abandonmentEvent"].is_null());

    let expected_total = (price * Decimal::from(3))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total: Decimal = body["order"]["total"]
        .as_str()
        .map_or_else(
            || {
                Decimal::try_from(body["order"]["total"].as_f64().expect("total missing"))
                    .expect("total not a decimal")
            },
            |s| s.parse().expect("total not a decimal"),
        )
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    assert_eq!(total, expected_total);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_order_with_unknown_product_lists_missing_ids() {
    let client = Client::new();
    let missing = Uuid::new_v4();

    let resp = client
        .post(format!("{}/orders", base_url()))
        .json(&json!({
            "sessionId": fresh_session(),
            "customerEmail": "buyer@example.com",
            "customerName": "Integration Buyer",
            "items": [{ "productId": missing.to_string(), "quantity": 1 }],
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");

    assert_eq!(body["accepted"], false);
    assert_eq!(body["error"], "Some products no longer exist");
    let listed = body["missingProducts"]
        .as_array()
        .expect("missingProducts missing");
    assert_eq!(listed, &vec![Value::from(missing.to_string())]);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_event_listing_includes_new_event() {
    let client = Client::new();
    let pool = db_pool().await;
    let (store_id, product_id, name, price) = seeded_store_and_product(&pool).await;
    let session_id = fresh_session();

    let recorded =
        record_abandonment(&client, store_id, &session_id, product_id, &name, &price).await;
    let event_id = recorded["abandonmentEvent"]["id"]
        .as_str()
        .expect("event id missing")
        .to_owned();

    let resp = client
        .get(format!("{}/abandonment-events", base_url()))
        .send()
        .await
        .expect("Failed to list events");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    assert_eq!(body["accepted"], true);
    let events = body["abandonmentEvents"]
        .as_array()
        .expect("abandonmentEvents missing");
    assert!(
        events
            .iter()
            .any(|e| e["id"].as_str() == Some(event_id.as_str()))
    );
}
