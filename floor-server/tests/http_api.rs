//! HTTP surface tests
//!
//! Drives the full router with in-process requests: request validation,
//! the closure confirmation conflict, and the happy closure path.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use floor_server::{Config, Server, ServerState};

fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_str().unwrap(), 0);
    let state = ServerState::initialize(&config).unwrap();
    (Server::build_app(state), dir)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn order_body(table: &str, product_id: i64, quantity: i32) -> Value {
    json!({
        "table_number": table,
        "items": [{ "product_id": product_id, "quantity": quantity }],
    })
}

#[tokio::test]
async fn test_submit_then_query_table() {
    let (app, _dir) = test_app();

    let (status, body) = send(&app, "POST", "/api/orders", Some(order_body("4", 101, 2))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let order_id = body["order_id"].as_str().unwrap().to_string();
    assert!(order_id.starts_with("ord-"));

    let (status, body) = send(&app, "GET", "/api/tables/4/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["running_total"], json!(20.0));
    assert_eq!(body["orders"][0]["id"], json!(order_id));
}

#[tokio::test]
async fn test_close_requires_confirmation_then_forces() {
    let (app, _dir) = test_app();
    send(&app, "POST", "/api/orders", Some(order_body("7", 103, 1))).await;

    // Still processing: the close is a 409 naming the orders to confirm
    let (status, body) = send(
        &app,
        "POST",
        "/api/tables/7/close",
        Some(json!({ "payment_method": "cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!(8003));
    assert_eq!(body["details"]["order_ids"].as_array().unwrap().len(), 1);

    // Forced close settles the table
    let (status, body) = send(
        &app,
        "POST",
        "/api/tables/7/close",
        Some(json!({ "payment_method": "cash", "force": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["subtotal"], json!(8.0));
    assert_eq!(body["order"]["tax"], json!(0.8));
    assert_eq!(body["order"]["total"], json!(8.8));
}

#[tokio::test]
async fn test_close_rejects_blank_payment_method() {
    let (app, _dir) = test_app();
    send(&app, "POST", "/api/orders", Some(order_body("2", 201, 1))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/tables/2/close",
        Some(json!({ "payment_method": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("payment_method")
    );
}

#[tokio::test]
async fn test_complete_rejects_blank_payment_method() {
    let (app, _dir) = test_app();
    let (_, body) = send(&app, "POST", "/api/orders", Some(json!({
        "items": [{ "product_id": 202, "quantity": 1 }],
    })))
    .await;
    let order_id = body["order_id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/orders/{order_id}/complete"),
        Some(json!({ "payment_method": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_rejects_oversized_reason() {
    let (app, _dir) = test_app();
    let (_, body) = send(&app, "POST", "/api/orders", Some(order_body("9", 101, 1))).await;
    let order_id = body["order_id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/orders/{order_id}/cancel"),
        Some(json!({ "reason": "x".repeat(501) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A sane reason still goes through
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/orders/{order_id}/cancel"),
        Some(json!({ "reason": "customer left" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn test_get_unknown_order_is_404() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, "GET", "/api/orders/ord-missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!(3));
}

#[tokio::test]
async fn test_health_reports_storage() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));

    let (status, body) = send(&app, "GET", "/api/health/detailed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["storage"]["status"], json!("ok"));
}
