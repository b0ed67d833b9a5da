#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use allowance_api::auth::jwt::{generate_token, JwtConfig};
use allowance_api::config::ServerConfig;
use allowance_api::router::build_app_router;
use allowance_api::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults and the given upload dir.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiry_hours: 24,
        },
    }
}

/// Build the full application router (same middleware stack as production).
///
/// Uploads go to the system temp dir; tests that inspect uploaded files use
/// [`build_test_app_with_uploads`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_uploads(pool, &std::env::temp_dir())
}

pub fn build_test_app_with_uploads(pool: PgPool, upload_dir: &Path) -> Router {
    let config = test_config(upload_dir);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A valid bearer token. The auth extractor only checks the signature and
/// expiry, so no user row is needed.
pub fn test_token() -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        expiry_hours: 24,
    };
    generate_token(1, &config).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers (authenticated)
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn authed(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", test_token()))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, authed(Method::GET, uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, authed(Method::DELETE, uri).body(Body::empty()).unwrap()).await
}

pub async fn patch(app: Router, uri: &str) -> Response<Body> {
    send(app, authed(Method::PATCH, uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = authed(method, uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Request helpers (no token)
// ---------------------------------------------------------------------------

pub async fn get_anon(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json_anon(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures through the API
// ---------------------------------------------------------------------------

/// Create a member and return its id.
pub async fn create_member(pool: &PgPool, name: &str, allowance: f64) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/v1/member",
        serde_json::json!({ "name": name, "birthdate": "15/06/2014", "allowance": allowance }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a task and return its id.
pub async fn create_task(pool: &PgPool, description: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/v1/task",
        serde_json::json!({ "description": description }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create an on-hold checklist with one item per `(task_id, value)` and
/// return the full JSON payload (`data`).
pub async fn create_checklist(
    pool: &PgPool,
    member_id: i64,
    name: &str,
    items: &[(i64, f64)],
) -> serde_json::Value {
    let items: Vec<_> = items
        .iter()
        .map(|(task_id, value)| serde_json::json!({ "task_id": task_id, "value": value }))
        .collect();
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/v1/checklist",
        serde_json::json!({ "member_id": member_id, "name": name, "items": items }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"].clone()
}
