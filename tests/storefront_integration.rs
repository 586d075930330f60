//! Integration tests for the storefront HTTP API
//!
//! These tests drive the full router:
//! - Catalog search and lookup
//! - Cart mutations, totals and session cookies
//! - Cart persistence across a restart
//! - Checkout validation, UPI bypass and hand-off
//! - Contact form stub

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`

use alnoor_kesar::cart::storage::{CartStorage, FileStorage, MemoryStorage};
use alnoor_kesar::cart::{AppState, SharedState};
use alnoor_kesar::catalog::Catalog;
use alnoor_kesar::checkout::RecordingSink;
use alnoor_kesar::config::StorefrontConfig;
use alnoor_kesar::router::create_app_router;

/// Helper bundling the router with the sink it reports to
struct TestApp {
    router: axum::Router,
    state: SharedState,
    sink: Arc<RecordingSink>,
}

fn catalog() -> Catalog {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/products.json");
    Catalog::load(path).unwrap()
}

fn create_test_app_with_storage(storage: Arc<dyn CartStorage>) -> TestApp {
    let config = StorefrontConfig {
        contact_delay: Duration::ZERO,
        ..StorefrontConfig::default()
    };
    let sink = Arc::new(RecordingSink::new());
    let state = AppState::new(catalog(), &config)
        .unwrap()
        .with_storage(storage)
        .with_sink(sink.clone());
    let state = Arc::new(state);
    TestApp {
        router: create_app_router(state.clone()),
        state,
        sink,
    }
}

/// Helper function to create a test app instance
fn create_test_app() -> TestApp {
    create_test_app_with_storage(Arc::new(MemoryStorage::new()))
}

/// Sends a request and returns status, `Set-Cookie` (if any) and JSON body
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().split(';').next().unwrap().to_string());

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, set_cookie, body)
}

/// Starts a session by reading the (empty) cart and returns its cookie
async fn start_session(app: &axum::Router) -> String {
    let (status, cookie, _) = send(app, "GET", "/cart", None, None).await;
    assert_eq!(status, StatusCode::OK);
    cookie.expect("new session should set a cookie")
}

async fn add(app: &axum::Router, cookie: &str, product_id: &str) -> Value {
    let (status, _, body) = send(
        app,
        "POST",
        "/cart/items",
        Some(cookie),
        Some(json!({ "productId": product_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

fn valid_shipping() -> Value {
    json!({
        "fullName": "A",
        "phone": "9876543210",
        "email": "a@b.co",
        "addressLine1": "X",
        "city": "Y",
        "state": "Delhi",
        "pinCode": "110001"
    })
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app();
    let (status, _, body) = send(&app.router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_search_products() {
    let app = create_test_app();

    let (status, _, body) = send(&app.router, "GET", "/products?q=SAFFRON", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert!(!products.is_empty());
    assert!(products.iter().all(|p| {
        let name = p["name"].as_str().unwrap().to_lowercase();
        let description = p["description"].as_str().unwrap_or("").to_lowercase();
        name.contains("saffron") || description.contains("saffron")
    }));

    let (_, _, body) = send(
        &app.router,
        "GET",
        "/products?category=Dry%20Fruits",
        None,
        None,
    )
    .await;
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["category"] == "Dry Fruits"));

    let (_, _, all) = send(&app.router, "GET", "/products?category=All", None, None).await;
    let (_, _, unfiltered) = send(&app.router, "GET", "/products", None, None).await;
    assert_eq!(all, unfiltered);
}

#[tokio::test]
async fn test_categories_and_product_lookup() {
    let app = create_test_app();

    let (_, _, categories) = send(&app.router, "GET", "/categories", None, None).await;
    assert_eq!(categories[0], "All");

    let (status, _, product) =
        send(&app.router, "GET", "/products/saffron-mongra-1g", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["discountPrice"], 499);

    let (status, _, body) = send(&app.router, "GET", "/products/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_new_session_sets_cookie_once() {
    let app = create_test_app();
    let cookie = start_session(&app.router).await;
    assert!(cookie.starts_with("cart_session="));

    let (_, again, _) = send(&app.router, "GET", "/cart", Some(&cookie), None).await;
    assert!(again.is_none());
}

#[tokio::test]
async fn test_add_uses_discount_price_and_aggregates() {
    let app = create_test_app();
    let cookie = start_session(&app.router).await;

    add(&app.router, &cookie, "saffron-mongra-1g").await;
    let body = add(&app.router, &cookie, "saffron-mongra-1g").await;

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["price"], 499);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["weight"], "1g");
    assert_eq!(body["totalItems"], 2);
    assert_eq!(body["totalPrice"], 998);
}

#[tokio::test]
async fn test_anonymous_reads_do_not_accumulate_sessions() {
    let app = create_test_app();

    for _ in 0..200 {
        let (status, cookie, _) = send(&app.router, "GET", "/cart", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(cookie.is_some());

        let (status, _, body) = send(
            &app.router,
            "POST",
            "/checkout/payment",
            None,
            Some(json!({ "method": "upi" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "show_payment_code");
    }

    assert_eq!(app.state.carts.len(), 0);
    assert_eq!(app.state.checkouts.len(), 0);
    assert_eq!(app.state.last_seen.len(), 0);

    // A mutation makes exactly one session live.
    let cookie = start_session(&app.router).await;
    add(&app.router, &cookie, "kahwa-tea-100g").await;
    send(
        &app.router,
        "POST",
        "/checkout/payment",
        Some(&cookie),
        Some(json!({ "method": "upi" })),
    )
    .await;
    assert_eq!(app.state.carts.len(), 1);
    assert_eq!(app.state.checkouts.len(), 1);
}

#[tokio::test]
async fn test_idle_sessions_are_evicted() {
    let app = create_test_app();
    let cookie = start_session(&app.router).await;
    add(&app.router, &cookie, "walnut-kernels-500g").await;
    assert_eq!(app.state.carts.len(), 1);

    assert_eq!(app.state.evict_idle(Duration::ZERO), 1);
    assert!(app.state.carts.is_empty());

    // The cart comes back from storage on the next request.
    let (_, _, body) = send(&app.router, "GET", "/cart", Some(&cookie), None).await;
    assert_eq!(body["totalPrice"], 750);
}

#[tokio::test]
async fn test_add_unknown_product() {
    let app = create_test_app();
    let cookie = start_session(&app.router).await;

    let (status, _, _) = send(
        &app.router,
        "POST",
        "/cart/items",
        Some(&cookie),
        Some(json!({ "productId": "missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_totals_and_quantity_updates() {
    let app = create_test_app();
    let cookie = start_session(&app.router).await;

    // 1200 (no discount) and 750 (discounted walnuts)
    add(&app.router, &cookie, "mamra-almonds-500g").await;
    add(&app.router, &cookie, "walnut-kernels-500g").await;

    let (_, _, body) = send(
        &app.router,
        "PATCH",
        "/cart/items/walnut-kernels-500g",
        Some(&cookie),
        Some(json!({ "quantity": 2 })),
    )
    .await;
    assert_eq!(body["totalItems"], 3);
    assert_eq!(body["totalPrice"], 1200 + 2 * 750);

    let (_, _, body) = send(
        &app.router,
        "PATCH",
        "/cart/items/walnut-kernels-500g",
        Some(&cookie),
        Some(json!({ "quantity": 0 })),
    )
    .await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["totalPrice"], 1200);
}

#[tokio::test]
async fn test_remove_twice_is_noop() {
    let app = create_test_app();
    let cookie = start_session(&app.router).await;
    add(&app.router, &cookie, "kahwa-tea-100g").await;
    add(&app.router, &cookie, "shilajit-20g").await;

    let (_, _, once) = send(
        &app.router,
        "DELETE",
        "/cart/items/kahwa-tea-100g",
        Some(&cookie),
        None,
    )
    .await;
    let (status, _, twice) = send(
        &app.router,
        "DELETE",
        "/cart/items/kahwa-tea-100g",
        Some(&cookie),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(once, twice);
    assert_eq!(twice["items"][0]["id"], "shilajit-20g");
}

#[tokio::test]
async fn test_clear_and_visibility() {
    let app = create_test_app();
    let cookie = start_session(&app.router).await;

    let (_, _, body) = send(
        &app.router,
        "POST",
        "/cart/items",
        Some(&cookie),
        Some(json!({ "productId": "kahwa-tea-100g", "openCart": true })),
    )
    .await;
    assert_eq!(body["isOpen"], true);

    let (_, _, body) = send(&app.router, "POST", "/cart/toggle", Some(&cookie), None).await;
    assert_eq!(body["isOpen"], false);
    let (_, _, body) = send(&app.router, "POST", "/cart/open", Some(&cookie), None).await;
    assert_eq!(body["isOpen"], true);
    let (_, _, body) = send(&app.router, "POST", "/cart/close", Some(&cookie), None).await;
    assert_eq!(body["isOpen"], false);
    assert_eq!(body["totalItems"], 1);

    let (_, _, body) = send(&app.router, "DELETE", "/cart", Some(&cookie), None).await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["totalPrice"], 0);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let cookie = {
        let app = create_test_app_with_storage(Arc::new(FileStorage::open(dir.path()).unwrap()));
        let cookie = start_session(&app.router).await;
        add(&app.router, &cookie, "saffron-lacha-5g").await;
        add(&app.router, &cookie, "dried-apricots-250g").await;
        send(&app.router, "POST", "/cart/open", Some(&cookie), None).await;
        cookie
    };

    let app = create_test_app_with_storage(Arc::new(FileStorage::open(dir.path()).unwrap()));
    let (_, _, body) = send(&app.router, "GET", "/cart", Some(&cookie), None).await;

    let ids: Vec<_> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["saffron-lacha-5g", "dried-apricots-250g"]);
    assert_eq!(body["totalPrice"], 2200 + 450);
    assert_eq!(body["isOpen"], false);
}

#[tokio::test]
async fn test_checkout_validate_banner() {
    let app = create_test_app();

    let (status, _, body) = send(
        &app.router,
        "POST",
        "/checkout/validate",
        None,
        Some(json!({ "shipping": { "fullName": "", "phone": "123" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(
        body["error"],
        "Please fill Full Name field to enable payment method"
    );
    assert_eq!(body["field"], "fullName");

    let (_, _, body) = send(
        &app.router,
        "POST",
        "/checkout/validate",
        None,
        Some(json!({ "shipping": valid_shipping() })),
    )
    .await;
    assert_eq!(body, json!({ "valid": true }));
}

#[tokio::test]
async fn test_upi_shows_payment_code_without_details() {
    let app = create_test_app();
    let cookie = start_session(&app.router).await;
    add(&app.router, &cookie, "saffron-mongra-1g").await;

    let (status, _, body) = send(
        &app.router,
        "POST",
        "/checkout/payment",
        Some(&cookie),
        Some(json!({ "method": "upi" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "show_payment_code");
    assert_eq!(body["paymentCode"], "/upi-qr.png");
    assert!(app.sink.sent().is_empty());
}

#[tokio::test]
async fn test_card_blocked_by_validation() {
    let app = create_test_app();
    let cookie = start_session(&app.router).await;
    add(&app.router, &cookie, "saffron-mongra-1g").await;

    let mut shipping = valid_shipping();
    shipping["phone"] = json!("98765432100");

    let (status, _, body) = send(
        &app.router,
        "POST",
        "/checkout/payment",
        Some(&cookie),
        Some(json!({ "method": "card", "shipping": shipping })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Please enter a valid 10-digit Phone Number");
    assert_eq!(body["field"], "phone");
    assert!(app.sink.sent().is_empty());
}

#[tokio::test]
async fn test_cod_hands_off_order() {
    let app = create_test_app();
    let cookie = start_session(&app.router).await;
    add(&app.router, &cookie, "mamra-almonds-500g").await;

    let (status, _, body) = send(
        &app.router,
        "POST",
        "/checkout/payment",
        Some(&cookie),
        Some(json!({ "method": "cod", "shipping": valid_shipping() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "handed_off");
    assert_eq!(body["method"], "cod");
    assert!(body["handoffUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://wa.me/919697499557?text="));

    let sent = app.sink.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("• Mamra Almonds (500g) x1 - ₹1,200"));
    assert!(sent[0].ends_with("Cash on Delivery"));
}

#[tokio::test]
async fn test_complete_order_flow() {
    let app = create_test_app();
    let cookie = start_session(&app.router).await;
    add(&app.router, &cookie, "saffron-mongra-2g").await;
    add(&app.router, &cookie, "saffron-mongra-2g").await;

    send(
        &app.router,
        "POST",
        "/checkout/payment",
        Some(&cookie),
        Some(json!({ "method": "upi" })),
    )
    .await;

    let (status, _, body) = send(
        &app.router,
        "POST",
        "/checkout/complete",
        Some(&cookie),
        Some(json!({ "shipping": valid_shipping() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["method"], "upi");

    let sent = app.sink.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("*Total: ₹1,898*"));
    assert!(sent[0].ends_with("UPI Payment (Will share screenshot)"));

    // The hand-off does not empty the cart
    let (_, _, cart) = send(&app.router, "GET", "/cart", Some(&cookie), None).await;
    assert_eq!(cart["totalItems"], 2);
}

#[tokio::test]
async fn test_complete_order_with_empty_cart() {
    let app = create_test_app();
    let cookie = start_session(&app.router).await;

    let (status, _, body) = send(
        &app.router,
        "POST",
        "/checkout/complete",
        Some(&cookie),
        Some(json!({ "shipping": valid_shipping() })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Your cart is empty");
}

#[tokio::test]
async fn test_contact_stub() {
    let app = create_test_app();

    let (status, _, body) = send(
        &app.router,
        "POST",
        "/contact",
        None,
        Some(json!({
            "name": "Imran",
            "email": "imran@example.in",
            "phone": "9876543210",
            "message": "Bulk order?"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Thank you for reaching out! We'll get back to you within 24 hours."
    );
    assert!(body["handoffUrl"].as_str().unwrap().contains("text="));
    assert!(app.sink.sent()[0].contains("*Name:* Imran"));
}

#[tokio::test]
async fn test_invalid_json_rejected() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/cart/items")
        .header("content-type", "application/json")
        .body(Body::from("invalid json {{{"))
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
