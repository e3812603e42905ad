//! Shared helpers for API integration tests.
//!
//! Uses Axum's `tower::ServiceExt::oneshot` to send requests directly to
//! the router without an actual TCP listener, against the same middleware
//! stack production uses. Storage and notifications run on their mock
//! implementations.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use snapdex_api::auth::jwt::{generate_access_token, JwtConfig};
use snapdex_api::auth::password::hash_password;
use snapdex_api::config::ServerConfig;
use snapdex_api::router::build_app_router;
use snapdex_api::state::AppState;
use snapdex_core::notification::MockNotifier;
use snapdex_db::models::user::{CreateUser, User};
use snapdex_db::repositories::UserRepo;
use snapdex_storage::{MockStorage, StorageConfig};

/// Stable JWT secret for tests.
const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Password every seeded user gets.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        storage: StorageConfig {
            bucket: "snapdex-test".to_string(),
            region: "eu-west-1".to_string(),
            endpoint_url: None,
            access_key_id: "test".to_string(),
            secret_access_key: "test".to_string(),
            url_expiry_secs: 3600,
        },
    }
}

/// Full application router with mock storage and notifier, mirroring the
/// production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage: Arc::new(MockStorage::new()),
        notifier: Arc::new(MockNotifier::new()),
    };
    build_app_router(state, &config)
}

/// Create a user directly in the database and mint an access token for it.
pub async fn seed_user(pool: &PgPool, username: &str) -> (User, String) {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    let token =
        generate_access_token(user.id, &test_config().jwt).expect("token generation should succeed");
    (user, token)
}

async fn send(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    };
    app.clone()
        .oneshot(request)
        .await
        .expect("request should not fail")
}

pub async fn get(app: &Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, path, Some(token), None).await
}

pub async fn get_public(app: &Router, path: &str) -> Response<Body> {
    send(app, Method::GET, path, None, None).await
}

pub async fn post_json(app: &Router, path: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, path, Some(token), Some(body)).await
}

pub async fn post_json_public(app: &Router, path: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, path, None, Some(body)).await
}

pub async fn put_json(app: &Router, path: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, path, Some(token), Some(body)).await
}

pub async fn put(app: &Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, path, Some(token), None).await
}

pub async fn delete(app: &Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, path, Some(token), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// String form of a payload's `id` field.
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("payload should have an id").to_string()
}

// ---------------------------------------------------------------------------
// Fixtures (created through the HTTP API)
// ---------------------------------------------------------------------------

/// POST a collection as `token`, asserting 201.
pub async fn create_collection(app: &Router, token: &str, name: &str) -> Value {
    let response = post_json(
        app,
        "/api/v1/collections",
        token,
        json!({ "name": name, "description": "a test collection" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// POST an item under a collection as `token`, asserting 201.
pub async fn create_item(app: &Router, token: &str, collection_id: &str, name: &str) -> Value {
    let response = post_json(
        app,
        &format!("/api/v1/collections/{collection_id}/items"),
        token,
        json!({
            "name": name,
            "description": "a test item",
            "object_name": format!("items/{name}.png"),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// POST a pending item under a collection as `token`, asserting 201.
pub async fn create_pending_item(
    app: &Router,
    token: &str,
    collection_id: &str,
    name: &str,
) -> Value {
    let response = post_json(
        app,
        &format!("/api/v1/collections/{collection_id}/pending-items"),
        token,
        json!({
            "name": name,
            "description": "a proposed item",
            "object_name": format!("pending/{name}.png"),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// POST a snap under an item as `token`, asserting 201.
pub async fn create_snap(app: &Router, token: &str, item_id: &str) -> Value {
    let response = post_json(
        app,
        &format!("/api/v1/items/{item_id}/snaps"),
        token,
        json!({
            "comment": "nice catch",
            "object_name": format!("snaps/{item_id}.png"),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}
