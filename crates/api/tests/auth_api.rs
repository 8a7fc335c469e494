//! Login, current-account and profile endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get, get_auth, owner, post_json, put_json_auth, TEST_PASSWORD,
};
use serde_json::json;

#[tokio::test]
async fn login_returns_token_and_public_user() {
    let state = common::test_state();
    let (account, _) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);

    let response = post_json(
        app.clone(),
        "/api/auth/login",
        json!({ "email": " Owner@Test.com ", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let token = json["token"].as_str().expect("token string");
    assert_eq!(json["user"]["id"], account.id);
    assert_eq!(json["user"]["email"], "owner@test.com");
    assert_eq!(json["user"]["companyName"], "Test Co");
    assert!(json["user"].get("passwordHash").is_none());

    let me = get_auth(app, "/api/auth/me", token).await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(body_json(me).await["user"]["id"], account.id);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let state = common::test_state();
    owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);

    let wrong = post_json(
        app.clone(),
        "/api/auth/login",
        json!({ "email": "owner@test.com", "password": "nope-nope" }),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong = body_json(wrong).await;

    let unknown = post_json(
        app,
        "/api/auth/login",
        json!({ "email": "ghost@test.com", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(unknown).await, wrong);
    assert_eq!(wrong["error"], "Invalid credentials");
}

#[tokio::test]
async fn private_routes_reject_missing_or_bad_tokens() {
    let state = common::test_state();
    let app = common::build_test_app(&state);

    for uri in ["/api/auth/me", "/api/proposals", "/api/analytics/overview"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    }

    let response = get_auth(app, "/api/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_missing_account_is_rejected() {
    let state = common::test_state();
    let (only, _) = owner(&state, "only@test.com").await;

    // A validly signed token whose account exists in another store only.
    let other_state = common::test_state();
    owner(&other_state, "first@test.com").await;
    let (stranger, token) = owner(&other_state, "second@test.com").await;
    assert_ne!(stranger.id, only.id);

    let response = get_auth(common::build_test_app(&state), "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_applies_fields() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);

    let response = put_json_auth(
        app.clone(),
        "/api/profile",
        &token,
        json!({ "name": "Renamed", "companyName": "", "email": "New@Test.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["name"], "Renamed");
    assert_eq!(json["user"]["companyName"], "Test Co");
    assert_eq!(json["user"]["email"], "new@test.com");

    let profile = body_json(get_auth(app, "/api/profile", &token).await).await;
    assert_eq!(profile["user"]["name"], "Renamed");
}

#[tokio::test]
async fn password_change_requires_current_password() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);

    let response = put_json_auth(
        app.clone(),
        "/api/profile",
        &token,
        json!({ "currentPassword": "wrong", "newPassword": "brand-new-pass" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app.clone(),
        "/api/profile",
        &token,
        json!({ "currentPassword": TEST_PASSWORD, "newPassword": "short" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app.clone(),
        "/api/profile",
        &token,
        json!({ "currentPassword": TEST_PASSWORD, "newPassword": "brand-new-pass" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let login = post_json(
        app,
        "/api/auth/login",
        json!({ "email": "owner@test.com", "password": "brand-new-pass" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[tokio::test]
async fn email_taken_by_another_account_conflicts() {
    let state = common::test_state();
    owner(&state, "taken@test.com").await;
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);

    let response = put_json_auth(
        app,
        "/api/profile",
        &token,
        json!({ "email": "taken@test.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
