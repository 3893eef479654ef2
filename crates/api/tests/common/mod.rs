#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use harbor_api::auth::jwt::{generate_access_token, JwtConfig};
use harbor_api::auth::password::hash_password;
use harbor_api::config::ServerConfig;
use harbor_api::router::build_app_router;
use harbor_api::state::AppState;
use harbor_core::types::DbId;
use harbor_db::models::user::CreateUser;
use harbor_db::repositories::UserRepo;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 15,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router, same middleware stack as production.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A user inserted directly in the database, with a valid access token.
pub struct TestUser {
    pub id: DbId,
    pub token: String,
}

pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> TestUser {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed");

    let token = generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed");
    TestUser { id: user.id, token }
}

/// Create an asset through the API as `owner`, returning its id.
pub async fn create_asset(app: Router, owner: &TestUser, body: Value) -> DbId {
    let response = post_json_auth(app, "/api/v1/assets", body, &owner.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_i64()
        .expect("asset id")
}

/// A sailboat priced at 100.00/day and 600.00/week with optional skipper service.
pub fn sailboat() -> Value {
    serde_json::json!({
        "name": "Aurora",
        "kind": "sailboat",
        "location": "Split, Croatia",
        "capacity": 6,
        "daily_price": 10000,
        "weekly_price": 60000,
        "skipper_available": true,
        "skipper_daily_rate": 15000,
        "required_license_level": 2
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should not fail")
}

fn json_request(method: &str, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, empty_request("GET", uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request("GET", uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request("POST", uri, &body, None)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request("POST", uri, &body, Some(token))).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request("POST", uri, Some(token))).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request("PUT", uri, &body, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request("DELETE", uri, Some(token))).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
