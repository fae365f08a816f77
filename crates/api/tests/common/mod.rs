//! Shared helpers for API integration tests.
//!
//! Mirrors the router construction in `main.rs` (via `build_app_router`) so
//! tests exercise the same middleware stack that production uses, with the
//! scripted gateway and in-memory storage swapped in.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use carousel_api::auth::jwt::{generate_access_token, JwtConfig};
use carousel_api::config::ServerConfig;
use carousel_api::router::build_app_router;
use carousel_api::state::AppState;
use carousel_gateway::fake::ScriptedGateway;
use carousel_storage::MemoryStorage;

/// Build a test `ServerConfig` with safe defaults and a known JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the application router over a scripted gateway. Unscripted text
/// calls fail with a 500-shaped gateway error; unscripted image calls
/// succeed with a stub payload.
pub fn build_test_app(pool: PgPool, gateway: Arc<ScriptedGateway>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        gateway,
        storage: Arc::new(MemoryStorage::new()),
    };
    build_app_router(state, &config)
}

/// A bearer token accepted by the test config.
pub fn test_token() -> String {
    generate_access_token(1, &test_config().jwt).expect("token generation should succeed")
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST with a JSON body and optional bearer token.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Send a bodyless POST with an optional bearer token.
pub async fn post_empty(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
