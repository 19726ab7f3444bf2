#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use cytomine_api::auth::jwt::JwtConfig;
use cytomine_api::auth::password::hash_password;
use cytomine_api::config::ServerConfig;
use cytomine_api::router::build_app_router;
use cytomine_api::state::AppState;
use cytomine_core::roles::{ROLE_ADMIN, ROLE_USER};
use cytomine_core::types::DbId;
use cytomine_db::models::user::NewUser;
use cytomine_db::repositories::UserRepo;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Password of every user created by [`create_user`].
pub const TEST_PASSWORD: &str = "test-password-123";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8080".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router, middleware included, over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A persisted user and a valid access token for it.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: DbId,
    pub token: String,
}

/// Create a user with the given role and sign a token for it.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> TestUser {
    let user = UserRepo::create(
        pool,
        &NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed");

    let issued = test_config()
        .jwt
        .issue(user.id, &user.username, &user.role)
        .expect("token generation should succeed");
    TestUser {
        id: user.id,
        token: issued.token,
    }
}

pub async fn create_regular_user(pool: &PgPool, username: &str) -> TestUser {
    create_user(pool, username, ROLE_USER).await
}

pub async fn create_admin(pool: &PgPool, username: &str) -> TestUser {
    create_user(pool, username, ROLE_ADMIN).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Send an unauthenticated GET request.
pub async fn get_anonymous(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(&body)).await
}

/// POST without a body, as used by the undo/redo endpoints.
pub async fn post(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(&body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
