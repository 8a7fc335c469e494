#![allow(dead_code)]

use std::sync::Arc;

use arcdraft_api::auth::jwt::{generate_token, JwtConfig};
use arcdraft_api::auth::password::hash_password;
use arcdraft_api::config::{SeedConfig, ServerConfig};
use arcdraft_api::router::build_app_router;
use arcdraft_api::state::AppState;
use arcdraft_db::models::account::{Account, CreateAccount};
use arcdraft_db::store::AccountStore;
use arcdraft_db::MemoryStore;
use arcdraft_events::EventBus;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse-42";

/// A test `ServerConfig` with safe defaults and no database.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_mins: 60,
        },
        database_url: None,
        event_bus_capacity: 64,
        seed: SeedConfig {
            enabled: false,
            email: "demo@arcdraft.app".to_string(),
            password: "password123".to_string(),
        },
    }
}

/// Fresh state over an empty in-memory store.
pub fn test_state() -> AppState {
    let config = test_config();
    let event_bus = Arc::new(EventBus::new(config.event_bus_capacity));
    AppState::new(Arc::new(MemoryStore::new()), config, event_bus)
}

/// The production router (same middleware stack) over `state`.
pub fn build_test_app(state: &AppState) -> Router {
    build_app_router(state.clone(), &test_config())
}

/// Insert an account with [`TEST_PASSWORD`] directly into the store.
pub async fn create_account(state: &AppState, email: &str) -> Account {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    state
        .store
        .create_account(&CreateAccount {
            email: email.to_string(),
            password_hash,
            name: "Test Owner".to_string(),
            company_name: "Test Co".to_string(),
        })
        .await
        .expect("account creation should succeed")
}

pub fn token_for(account: &Account) -> String {
    generate_token(account.id, &test_config().jwt).expect("token generation should succeed")
}

/// An account plus a valid bearer token for it.
pub async fn owner(state: &AppState, email: &str) -> (Account, String) {
    let account = create_account(state, email).await;
    let token = token_for(&account);
    (account, token)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, &body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), &body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), &body)).await
}

/// Generate a proposal through the API and return the `proposal` object.
pub async fn generate_proposal(app: &Router, token: &str, body: Value) -> Value {
    let response = post_json_auth(app.clone(), "/api/proposals/ai-generate", token, body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["proposal"].clone()
}

/// Generate a minimal proposal and move it to `sent`.
pub async fn sent_proposal(app: &Router, token: &str, extra: Value) -> Value {
    let mut body = serde_json::json!({
        "clientName": "Alex",
        "projectTitle": "Website Relaunch",
    });
    if let (Some(fields), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        fields.extend(extra.clone());
    }
    let proposal = generate_proposal(app, token, body).await;
    let uri = format!("/api/proposals/{}", proposal["id"]);
    let response = put_json_auth(
        app.clone(),
        &uri,
        token,
        serde_json::json!({ "status": "sent" }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}
