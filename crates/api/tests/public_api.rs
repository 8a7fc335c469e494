//! Recipient-facing reads, passcode gate, engagement events and analytics.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{
    body_json, generate_proposal, get, get_auth, owner, post_json, put_json_auth, sent_proposal,
};
use serde_json::json;

fn public_uri(proposal: &serde_json::Value, suffix: &str) -> String {
    format!(
        "/api/public/proposals/{}{suffix}",
        proposal["publicSlug"].as_str().unwrap()
    )
}

fn timestamp(value: &serde_json::Value) -> DateTime<Utc> {
    value
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| panic!("expected a timestamp, got {value}"))
}

#[tokio::test]
async fn unprotected_proposal_is_served_with_branding() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);

    put_json_auth(
        app.clone(),
        "/api/settings/branding",
        &token,
        json!({ "primaryColor": "#3EF0E7" }),
    )
    .await;
    let proposal = generate_proposal(
        &app,
        &token,
        json!({ "clientName": "Alex", "projectTitle": "Open" }),
    )
    .await;

    let response = get(app, &public_uri(&proposal, "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["proposal"]["id"], proposal["id"]);
    assert_eq!(json["proposal"]["sections"], proposal["sections"]);
    assert!(json["proposal"].get("ownerId").is_none());
    assert!(json["proposal"].get("passcode").is_none());
    assert_eq!(json["branding"]["primaryColor"], "#3EF0E7");
}

#[tokio::test]
async fn branding_is_null_when_owner_has_none() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);

    let proposal = generate_proposal(
        &app,
        &token,
        json!({ "clientName": "Alex", "projectTitle": "Plain" }),
    )
    .await;
    let json = body_json(get(app, &public_uri(&proposal, "")).await).await;
    assert!(json["branding"].is_null());
}

#[tokio::test]
async fn unknown_slug_is_not_found_everywhere() {
    let state = common::test_state();
    let app = common::build_test_app(&state);

    let response = get(app.clone(), "/api/public/proposals/doesnotexist0000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    for suffix in ["verify-passcode", "events", "sign"] {
        let response = post_json(
            app.clone(),
            &format!("/api/public/proposals/doesnotexist0000/{suffix}"),
            json!({}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{suffix}");
    }
}

#[tokio::test]
async fn passcode_gate_hides_content_until_verified() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);

    let proposal = generate_proposal(
        &app,
        &token,
        json!({ "clientName": "Alex", "projectTitle": "Secret", "passcode": "4711" }),
    )
    .await;

    let locked = body_json(get(app.clone(), &public_uri(&proposal, "")).await).await;
    assert_eq!(
        locked,
        json!({ "requiresPasscode": true, "proposalId": proposal["id"] })
    );

    let wrong = post_json(
        app.clone(),
        &public_uri(&proposal, "/verify-passcode"),
        json!({ "passcode": "0000" }),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong = body_json(wrong).await;
    assert_eq!(wrong["error"], "Invalid passcode");
    assert!(wrong.get("proposal").is_none());

    let right = post_json(
        app,
        &public_uri(&proposal, "/verify-passcode"),
        json!({ "passcode": "4711" }),
    )
    .await;
    assert_eq!(right.status(), StatusCode::OK);
    let right = body_json(right).await;
    assert_eq!(right["proposal"]["sections"], proposal["sections"]);
    assert!(right["proposal"].get("passcode").is_none());
    assert!(right.get("branding").is_some());
}

#[tokio::test]
async fn passcode_with_surrounding_whitespace_still_unlocks() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);

    let proposal = generate_proposal(
        &app,
        &token,
        json!({ "clientName": "Alex", "projectTitle": "Secret", "passcode": " 4711" }),
    )
    .await;

    for candidate in [" 4711", "4711", "4711 "] {
        let response = post_json(
            app.clone(),
            &public_uri(&proposal, "/verify-passcode"),
            json!({ "passcode": candidate }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "{candidate:?}");
    }
}

#[tokio::test]
async fn unprotected_proposal_cannot_be_unlocked() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);

    let proposal = generate_proposal(
        &app,
        &token,
        json!({ "clientName": "Alex", "projectTitle": "Open" }),
    )
    .await;
    let response = post_json(
        app,
        &public_uri(&proposal, "/verify-passcode"),
        json!({ "passcode": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn view_moves_sent_to_viewed_but_not_draft() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);

    let draft = generate_proposal(
        &app,
        &token,
        json!({ "clientName": "Alex", "projectTitle": "Draft" }),
    )
    .await;
    let sent = sent_proposal(&app, &token, json!({})).await;

    for proposal in [&draft, &sent] {
        let response = post_json(
            app.clone(),
            &public_uri(proposal, "/events"),
            json!({ "eventType": "view" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await, json!({ "ok": true }));
    }

    let draft = body_json(
        get_auth(app.clone(), &format!("/api/proposals/{}", draft["id"]), &token).await,
    )
    .await;
    assert_eq!(draft["status"], "draft");
    assert!(draft["viewedAt"].is_string());

    let sent = body_json(get_auth(app, &format!("/api/proposals/{}", sent["id"]), &token).await)
        .await;
    assert_eq!(sent["status"], "viewed");
    assert!(sent["viewedAt"].is_string());
}

#[tokio::test]
async fn repeat_views_are_counted_and_refresh_viewed_at() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);
    let proposal = sent_proposal(&app, &token, json!({})).await;
    let proposal_uri = format!("/api/proposals/{}", proposal["id"]);

    post_json(
        app.clone(),
        &public_uri(&proposal, "/events"),
        json!({ "eventType": "view" }),
    )
    .await;
    let first = body_json(get_auth(app.clone(), &proposal_uri, &token).await).await;
    let first_viewed = timestamp(&first["viewedAt"]);

    tokio::time::sleep(Duration::from_millis(5)).await;
    post_json(
        app.clone(),
        &public_uri(&proposal, "/events"),
        json!({ "eventType": "view" }),
    )
    .await;
    let second = body_json(get_auth(app.clone(), &proposal_uri, &token).await).await;
    assert_eq!(second["status"], "viewed");
    assert!(timestamp(&second["viewedAt"]) > first_viewed);

    let analytics = body_json(
        get_auth(app, &format!("{proposal_uri}/analytics"), &token).await,
    )
    .await;
    assert_eq!(analytics["totalViews"], 2);
    assert_eq!(analytics["lastViewedAt"], second["viewedAt"]);
}

#[tokio::test]
async fn viewing_a_signed_proposal_keeps_it_signed() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);
    let proposal = sent_proposal(&app, &token, json!({})).await;
    let proposal_uri = format!("/api/proposals/{}", proposal["id"]);

    let signed = post_json(
        app.clone(),
        &public_uri(&proposal, "/sign"),
        json!({ "signerName": "Alex", "signatureType": "typed", "signatureData": "Alex" }),
    )
    .await;
    assert_eq!(signed.status(), StatusCode::OK);
    let signed_at = body_json(signed).await["proposal"]["signedAt"].clone();
    assert!(signed_at.is_string());

    let response = post_json(
        app.clone(),
        &public_uri(&proposal, "/events"),
        json!({ "eventType": "view" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let current = body_json(get_auth(app, &proposal_uri, &token).await).await;
    assert_eq!(current["status"], "signed");
    assert_eq!(current["signedAt"], signed_at);
    assert!(current["viewedAt"].is_string());
}

#[tokio::test]
async fn event_type_is_validated() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);
    let proposal = generate_proposal(
        &app,
        &token,
        json!({ "clientName": "Alex", "projectTitle": "Events" }),
    )
    .await;

    for body in [json!({}), json!({ "eventType": "" }), json!({ "eventType": "signed" })] {
        let response = post_json(app.clone(), &public_uri(&proposal, "/events"), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn analytics_start_empty() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);
    let proposal = generate_proposal(
        &app,
        &token,
        json!({ "clientName": "Alex", "projectTitle": "Quiet" }),
    )
    .await;

    let response = get_auth(
        app,
        &format!("/api/proposals/{}/analytics", proposal["id"]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "totalViews": 0,
            "lastViewedAt": null,
            "signedAt": null,
            "sectionViewStats": [],
            "eventsTimeline": [],
        })
    );
}

#[tokio::test]
async fn analytics_fold_views_and_section_dwell() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);
    let proposal = sent_proposal(&app, &token, json!({})).await;
    let events_uri = public_uri(&proposal, "/events");

    for body in [
        json!({ "eventType": "view" }),
        json!({ "eventType": "section_view", "metadata": { "sectionId": "s1", "durationMs": 1000 } }),
        json!({ "eventType": "scroll_depth", "metadata": { "depth": 75 } }),
        json!({ "eventType": "view", "metadata": null }),
        json!({ "eventType": "section_view", "metadata": { "sectionId": "s1", "durationMs": 3000 } }),
    ] {
        let response = post_json(app.clone(), &events_uri, body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(
        get_auth(
            app,
            &format!("/api/proposals/{}/analytics", proposal["id"]),
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(json["totalViews"], 2);
    assert!(json["lastViewedAt"].is_string());
    assert!(json["signedAt"].is_null());
    assert_eq!(
        json["sectionViewStats"],
        json!([{ "sectionId": "s1", "viewCount": 2, "avgTimeOnSection": 2000.0 }])
    );
    let timeline = json["eventsTimeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 5);
    assert_eq!(timeline[2]["eventType"], "scroll_depth");
    assert_eq!(timeline[3]["metadata"], json!({}));
}

#[tokio::test]
async fn flat_event_fields_stand_in_for_missing_metadata() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);
    let proposal = sent_proposal(&app, &token, json!({})).await;
    let events_uri = public_uri(&proposal, "/events");

    for body in [
        json!({ "eventType": "section_view", "sectionId": "s1", "durationMs": 500 }),
        json!({
            "eventType": "section_view",
            "sectionId": "ignored",
            "metadata": { "sectionId": "s1", "durationMs": 1500 }
        }),
    ] {
        let response = post_json(app.clone(), &events_uri, body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(
        get_auth(
            app,
            &format!("/api/proposals/{}/analytics", proposal["id"]),
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(
        json["sectionViewStats"],
        json!([{ "sectionId": "s1", "viewCount": 2, "avgTimeOnSection": 1000.0 }])
    );
    assert_eq!(
        json["eventsTimeline"][0]["metadata"],
        json!({ "sectionId": "s1", "durationMs": 500 })
    );
}

#[tokio::test]
async fn overview_with_no_proposals_is_all_zero() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let app = common::build_test_app(&state);

    let response = get_auth(app, "/api/analytics/overview", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "proposalsTotal": 0,
            "proposalsSigned": 0,
            "conversionRate": 0,
            "viewsLast30Days": 0,
        })
    );
}

#[tokio::test]
async fn overview_counts_only_own_views() {
    let state = common::test_state();
    let (_, token) = owner(&state, "owner@test.com").await;
    let (_, other) = owner(&state, "other@test.com").await;
    let app = common::build_test_app(&state);

    let mine = sent_proposal(&app, &token, json!({})).await;
    let theirs = sent_proposal(&app, &other, json!({})).await;
    for proposal in [&mine, &mine, &theirs] {
        post_json(
            app.clone(),
            &public_uri(proposal, "/events"),
            json!({ "eventType": "view" }),
        )
        .await;
    }

    let json = body_json(get_auth(app, "/api/analytics/overview", &token).await).await;
    assert_eq!(json["proposalsTotal"], 1);
    assert_eq!(json["viewsLast30Days"], 2);
    assert_eq!(json["conversionRate"], 0);
}
