//! HTTP-level integration tests for login, token enforcement and the
//! `/user` resource.

mod common;

use allowance_api::auth::password::hash_password;
use allowance_db::models::user::{CreateUser, User};
use allowance_db::repositories::UserRepo;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{body_json, delete, get, get_anon, post_json, post_json_anon, put_json, send};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PASSWORD: &str = "secret-123";

async fn create_test_user(pool: &PgPool, name: &str) -> User {
    let input = CreateUser {
        name: name.to_string(),
        email: format!("{name}@home.test"),
        password_hash: hash_password(PASSWORD).expect("hashing should succeed"),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_token_and_user(pool: PgPool) {
    let user = create_test_user(&pool, "parent").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "parent@home.test", "password": PASSWORD });
    let response = post_json_anon(app, "/v1/auth", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["token"].is_string());
    assert_eq!(json["data"]["expires_in"], 24 * 3600);
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert_eq!(json["data"]["user"]["email"], "parent@home.test");
    assert!(json["data"]["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn issued_token_opens_private_routes(pool: PgPool) {
    create_test_user(&pool, "parent").await;

    let body = serde_json::json!({ "email": "parent@home.test", "password": PASSWORD });
    let response = post_json_anon(common::build_test_app(pool.clone()), "/v1/auth", body).await;
    let token = body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string();

    let request = Request::builder()
        .uri("/v1/member")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = send(common::build_test_app(pool), request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_wrong_password_returns_401(pool: PgPool) {
    create_test_user(&pool, "parent").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "parent@home.test", "password": "not-it" });
    let response = post_json_anon(app, "/v1/auth", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_unknown_email_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "nobody@home.test", "password": PASSWORD });
    let response = post_json_anon(app, "/v1/auth", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_malformed_email_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "not-an-email", "password": PASSWORD });
    let response = post_json_anon(app, "/v1/auth", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["errors"][0]["field"], "email");
}

// ---------------------------------------------------------------------------
// Token enforcement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn private_route_without_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_anon(app, "/v1/member").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn private_route_with_garbage_token_returns_401(pool: PgPool) {
    let request = Request::builder()
        .uri("/v1/task")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();
    let response = send(common::build_test_app(pool), request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// /user
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_up_is_public_and_hides_password(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({
        "name": "  grace hopper ",
        "email": "grace@home.test",
        "password": "cobol-1959"
    });
    let response = post_json_anon(app, "/v1/user", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Grace hopper");
    assert!(json["data"].get("password_hash").is_none());

    let stored = UserRepo::find_by_email(&pool, "grace@home.test")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, "cobol-1959");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_up_rejects_taken_email(pool: PgPool) {
    create_test_user(&pool, "parent").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "name": "other parent",
        "email": "parent@home.test",
        "password": "long-enough"
    });
    let response = post_json_anon(app, "/v1/user", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "email");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_up_reports_every_invalid_field(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "name": "ab", "email": "nope", "password": "123" });
    let response = post_json_anon(app, "/v1/user", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Validation failed on 3 fields");
    let fields: Vec<_> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, ["email", "name", "password"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn padded_short_password_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "name": "padded",
        "email": "padded@home.test",
        "password": "  abc   "
    });
    let response = post_json_anon(app, "/v1/user", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "password");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trimmed_password_is_the_one_that_logs_in(pool: PgPool) {
    let body = serde_json::json!({
        "name": "spacey",
        "email": "spacey@home.test",
        "password": "  long-secret  "
    });
    let response = post_json_anon(common::build_test_app(pool.clone()), "/v1/user", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let login = serde_json::json!({ "email": "spacey@home.test", "password": "long-secret" });
    let response = post_json_anon(common::build_test_app(pool), "/v1/auth", login).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_update_list_and_delete(pool: PgPool) {
    let user = create_test_user(&pool, "parent").await;
    let uri = format!("/v1/user/{}", user.id);

    let body = serde_json::json!({
        "name": "renamed parent",
        "email": "parent@home.test",
        "password": "new-password"
    });
    let response = put_json(common::build_test_app(pool.clone()), &uri, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Renamed parent");

    let response = get(common::build_test_app(pool.clone()), "/v1/user").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["count"], 1);
    assert_eq!(json["data"]["rows"][0]["id"], user.id);

    let response = delete(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(common::build_test_app(pool), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_after_password_change_uses_new_password(pool: PgPool) {
    let user = create_test_user(&pool, "parent").await;

    let body = serde_json::json!({
        "name": "parent",
        "email": "parent@home.test",
        "password": "rotated-pw"
    });
    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/user/{}", user.id),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let old = serde_json::json!({ "email": "parent@home.test", "password": PASSWORD });
    let response = post_json(common::build_test_app(pool.clone()), "/v1/auth", old).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let new = serde_json::json!({ "email": "parent@home.test", "password": "rotated-pw" });
    let response = post_json(common::build_test_app(pool), "/v1/auth", new).await;
    assert_eq!(response.status(), StatusCode::OK);
}
