//! Integration tests for login and token-protected routes.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_regular_user, get, get_anonymous, post_json, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_returns_token(pool: PgPool) {
    let user = create_regular_user(&pool, "alice").await;
    let app = build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({"username": "alice", "password": TEST_PASSWORD}),
        "",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(!json["access_token"].as_str().unwrap().is_empty());
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "user");

    // The issued token opens protected routes.
    let token = json["access_token"].as_str().unwrap();
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/projects", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password_is_401(pool: PgPool) {
    create_regular_user(&pool, "alice").await;
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({"username": "alice", "password": "nope"}),
        "",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_unknown_user_is_401(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({"username": "ghost", "password": TEST_PASSWORD}),
        "",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_token_is_401(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get_anonymous(app, "/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_garbage_token_is_401(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/projects", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
