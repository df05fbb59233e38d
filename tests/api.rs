//! End-to-end router tests against the in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use catalog_api::{app, AppConfig, AppState, MemoryStore};
use serde_json::{json, Value};
use tower::ServiceExt;

fn router_from(config: AppConfig) -> Router {
    let state = AppState::from_config(Arc::new(MemoryStore::new()), &config);
    app(state, &config)
}

fn router_with(strict: bool) -> Router {
    router_from(AppConfig {
        strict_status_codes: strict,
        ..AppConfig::default()
    })
}

fn router() -> Router {
    router_with(false)
}

async fn call(router: &Router, method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(router: &Router, email: &str) -> String {
    let (status, body) = call(
        router,
        Method::POST,
        "/api/register",
        None,
        Some(json!({
            "name": "Ann",
            "email": email,
            "password": "secret",
            "password_confirmation": "secret"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn add_product(router: &Router, token: &str, name: &str) -> Value {
    let (status, body) = call(
        router,
        Method::POST,
        "/api/addProduct",
        Some(token),
        Some(json!({ "name": name, "detail": "A widget" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["data"].clone()
}

#[tokio::test]
async fn register_returns_token_and_name() {
    let router = router();
    let (status, body) = call(
        &router,
        Method::POST,
        "/api/register",
        None,
        Some(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "password": "secret",
            "password_confirmation": "secret"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["name"], "Ann");
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_email_is_a_validation_error() {
    let router = router();
    register(&router, "ann@example.com").await;
    let (status, body) = call(
        &router,
        Method::POST,
        "/api/register",
        None,
        Some(json!({
            "name": "Other",
            "email": "ann@example.com",
            "password": "secret",
            "password_confirmation": "secret"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation Error");
    assert_eq!(body["errors"]["email"], json!(["The email has already been taken."]));
}

#[tokio::test]
async fn login_checks_credentials() {
    let router = router();
    register(&router, "ann@example.com").await;

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "ann@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Unauthorized",
            "errors": { "error": "Invalid credentials" }
        })
    );

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "ann@example.com", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User logged in successfully");
    assert_eq!(body["data"]["name"], "Ann");
}

#[tokio::test]
async fn product_routes_require_a_valid_token() {
    let router = router();
    for token in [None, Some("1|not-a-real-token")] {
        let (status, body) = call(&router, Method::GET, "/api/listProducts", token, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Unauthenticated.");
    }
}

#[tokio::test]
async fn create_records_caller_and_formats_dates() {
    let router = router();
    let token = register(&router, "ann@example.com").await;
    let product = add_product(&router, &token, "Widget").await;

    assert_eq!(product["name"], "Widget");
    assert_eq!(product["detail"], "A widget");
    assert_eq!(product["status"], 1);
    assert_eq!(product["created_by"], 1);
    assert_eq!(product["updated_by"], Value::Null);
    let created_at = product["created_at"].as_str().unwrap();
    let parts: Vec<&str> = created_at.split('/').collect();
    assert_eq!(parts.iter().map(|p| p.len()).collect::<Vec<_>>(), [2, 2, 4]);

    let path = format!("/api/showProduct/{}", product["id"]);
    let (status, body) = call(&router, Method::GET, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product retrieved successfully");
    assert_eq!(body["data"], product);
}

#[tokio::test]
async fn missing_product_is_reported_with_legacy_status() {
    let router = router();
    let token = register(&router, "ann@example.com").await;
    for path in ["/api/showProduct/99999", "/api/showProduct/abc"] {
        let (status, body) = call(&router, Method::GET, path, Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Product not found");
    }
}

#[tokio::test]
async fn update_overwrites_fields() {
    let router = router();
    let token = register(&router, "ann@example.com").await;
    let product = add_product(&router, &token, "Widget").await;

    let path = format!("/api/updateProduct/{}", product["id"]);
    let (status, body) = call(
        &router,
        Method::POST,
        &path,
        Some(&token),
        Some(json!({ "name": "Gadget", "detail": "Shiny" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(body["data"]["name"], "Gadget");
    assert_eq!(body["data"]["updated_by"], 1);

    let (status, body) = call(&router, Method::POST, &path, Some(&token), Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Validation Error");
    assert!(body["errors"]["detail"].is_array());
}

#[tokio::test]
async fn deleted_product_disappears_from_list() {
    let router = router();
    let token = register(&router, "ann@example.com").await;
    let keep = add_product(&router, &token, "Keep").await;
    let gone = add_product(&router, &token, "Gone").await;

    let path = format!("/api/deleteProduct/{}", gone["id"]);
    let (status, body) = call(&router, Method::POST, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");
    assert_eq!(body["data"], json!([]));

    let (_, body) = call(&router, Method::GET, "/api/listProducts", Some(&token), None).await;
    assert_eq!(body["message"], "Products retrieved successfully");
    let ids: Vec<&Value> = body["data"].as_array().unwrap().iter().map(|p| &p["id"]).collect();
    assert_eq!(ids, [&keep["id"]]);

    let (status, body) = call(&router, Method::POST, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn logout_revokes_only_the_presented_token() {
    let router = router();
    let first = register(&router, "ann@example.com").await;
    let (_, body) = call(
        &router,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "ann@example.com", "password": "secret" })),
    )
    .await;
    let second = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = call(&router, Method::POST, "/api/logout", Some(&first), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User logged out successfully");

    let (status, _) = call(&router, Method::GET, "/api/listProducts", Some(&first), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&router, Method::GET, "/api/listProducts", Some(&second), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn strict_status_codes_use_conventional_statuses() {
    let router = router_with(true);
    let token = register(&router, "ann@example.com").await;

    let (status, body) = call(&router, Method::GET, "/api/showProduct/99999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, _) = call(&router, Method::POST, "/api/addProduct", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(&router, Method::GET, "/api/listProducts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let router = router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn probes_are_mounted_at_the_root() {
    let router = router();
    let (status, body) = call(&router, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&router, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    let (_, body) = call(&router, Method::GET, "/version", None, None).await;
    assert_eq!(body["name"], "catalog-api");
}

#[tokio::test]
async fn body_limit_follows_configuration() {
    let router = router_from(AppConfig {
        max_body_bytes: 8 * 1024 * 1024,
        ..AppConfig::default()
    });
    let email = format!("{}@example.com", "a".repeat(3 * 1024 * 1024));
    let (status, body) = call(
        &router,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": email, "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    for strict in [false, true] {
        let router = router_from(AppConfig {
            max_body_bytes: 16,
            strict_status_codes: strict,
            ..AppConfig::default()
        });
        let (status, body) = call(
            &router,
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "ann@example.com", "password": "secret" })),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn scalar_fields_are_accepted_as_text() {
    let router = router();
    let token = register(&router, "ann@example.com").await;
    let (status, body) = call(
        &router,
        Method::POST,
        "/api/addProduct",
        Some(&token),
        Some(json!({ "name": 123, "detail": 4.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["name"], "123");
    assert_eq!(body["data"]["detail"], "4.5");

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/addProduct",
        Some(&token),
        Some(json!({ "name": null, "detail": false })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Validation Error");
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["detail"].is_array());
}

#[tokio::test]
async fn overlong_product_name_is_a_validation_error() {
    let router = router();
    let token = register(&router, "ann@example.com").await;
    let (status, body) = call(
        &router,
        Method::POST,
        "/api/addProduct",
        Some(&token),
        Some(json!({ "name": "x".repeat(300), "detail": "d" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["errors"]["name"],
        json!(["The name field must not be greater than 255 characters."])
    );
}
