//! HTTP round-trip tests for the informational endpoints, auth identity,
//! rate limiting and error envelopes

mod common;

use axum::http::StatusCode;
use common::{test_server, test_server_with_config, ADMIN_TOKEN, USER_TOKEN};
use serde_json::json;
use storefront::config::{AppConfig, RateLimitConfig};

// ==============================================================
// Index and API info
// ==============================================================

#[tokio::test]
async fn test_index() {
    let server = test_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["endpoints"]["users"], "/api/users");
    assert_eq!(body["endpoints"]["products"], "/api/products");
}

#[tokio::test]
async fn test_api_info() {
    let server = test_server();

    let response = server.get("/api").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body["version"].as_str().is_some());
    assert!(body["endpoints"].is_object());
    assert!(body["features"].as_array().unwrap().len() >= 4);
}

// ==============================================================
// Health
// ==============================================================

#[tokio::test]
async fn test_health_is_public_and_healthy() {
    let server = test_server();

    let response = server.get("/api/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["database"], "reachable");
    assert!(body["data"]["version"].as_str().is_some());
}

#[tokio::test]
async fn test_health_aliases() {
    let server = test_server();
    server.get("/health").await.assert_status_ok();
    server.get("/healthz").await.assert_status_ok();
}

// ==============================================================
// Stats
// ==============================================================

#[tokio::test]
async fn test_stats_as_admin() {
    let server = test_server();
    server
        .post("/api/products")
        .authorization_bearer(USER_TOKEN)
        .json(&json!({ "name": "Widget", "price": 1.0, "quantity": 2 }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .get("/api/stats")
        .authorization_bearer(ADMIN_TOKEN)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["total_users"], 0);
    assert_eq!(body["data"]["total_products"], 1);
    assert_eq!(body["data"]["products_in_stock"], 1);
}

#[tokio::test]
async fn test_stats_without_token_is_unauthorized() {
    let server = test_server();
    server.get("/api/stats").await.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stats_as_regular_user_is_forbidden() {
    let server = test_server();
    server
        .get("/api/stats")
        .authorization_bearer(USER_TOKEN)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

// ==============================================================
// Token identity
// ==============================================================

#[tokio::test]
async fn test_me_with_valid_token() {
    let server = test_server();

    let response = server
        .get("/api/auth/me")
        .authorization_bearer(ADMIN_TOKEN)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["name"], "test-admin");
    assert_eq!(body["data"]["roles"][0], "admin");
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let server = test_server();
    server
        .get("/api/auth/me")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_unknown_token_is_unauthorized() {
    let server = test_server();
    server
        .get("/api/auth/me")
        .authorization_bearer("invalid_token")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// ==============================================================
// Error envelopes
// ==============================================================

#[tokio::test]
async fn test_unknown_route_returns_json_envelope() {
    let server = test_server();

    let response = server.get("/api/nonexistent-endpoint").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let server = test_server();

    let response = server
        .patch("/api/health")
        .authorization_bearer(ADMIN_TOKEN)
        .await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_invalid_json_body_is_bad_request() {
    let server = test_server();

    let response = server
        .post("/api/products")
        .authorization_bearer(USER_TOKEN)
        .text("not valid json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// ==============================================================
// Rate limiting
// ==============================================================

fn rate_limited_config(max_requests: u32) -> AppConfig {
    let mut config = AppConfig::default_config();
    config.rate_limit = Some(RateLimitConfig {
        max_requests,
        window_secs: 60,
    });
    config
}

#[tokio::test]
async fn test_rate_limit_kicks_in_after_budget() {
    let server = test_server_with_config(rate_limited_config(3));

    for _ in 0..3 {
        server.get("/api/products").await.assert_status_ok();
    }

    let response = server.get("/api/products").await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Too Many Requests");
}

#[tokio::test]
async fn test_rate_limit_is_per_caller() {
    let server = test_server_with_config(rate_limited_config(2));

    // Anonymous callers exhaust their bucket...
    server.get("/api/products").await.assert_status_ok();
    server.get("/api/products").await.assert_status_ok();
    server
        .get("/api/products")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    // ...while a token-bearing caller still has their own.
    server
        .get("/api/products")
        .authorization_bearer(USER_TOKEN)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_health_is_exempt_from_rate_limit() {
    let server = test_server_with_config(rate_limited_config(1));

    for _ in 0..5 {
        server.get("/api/health").await.assert_status_ok();
    }
}

// ==============================================================
// CORS
// ==============================================================

#[tokio::test]
async fn test_cors_headers_present() {
    let server = test_server();

    let response = server
        .get("/api/health")
        .add_header(
            axum::http::header::ORIGIN,
            axum::http::HeaderValue::from_static("http://example.com"),
        )
        .await;

    response.assert_status_ok();
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
