//! Recipient-facing handlers under `/public/proposals/{slug}`. No token.

use arcdraft_core::signature::SignRequest;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::engine::analytics::RecordEventRequest;
use crate::engine::proposals::{PublicPayload, PublicView};
use crate::engine::signing::SignOutcome;
use crate::engine::{AnalyticsPipeline, ProposalEngine, SignatureService};
use crate::error::AppResult;
use crate::middleware::client_meta::ClientMeta;
use crate::middleware::json::AppJson;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PasscodeRequest {
    #[serde(default)]
    pub passcode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

/// GET /api/public/proposals/{slug}
pub async fn get_proposal(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<PublicView>> {
    let view = ProposalEngine::new(&state).public_get(&slug).await?;
    Ok(Json(view))
}

/// POST /api/public/proposals/{slug}/verify-passcode
pub async fn verify_passcode(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    AppJson(input): AppJson<PasscodeRequest>,
) -> AppResult<Json<PublicPayload>> {
    let payload = ProposalEngine::new(&state)
        .verify_passcode(&slug, input.passcode.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(payload))
}

/// POST /api/public/proposals/{slug}/events
pub async fn record_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    AppJson(input): AppJson<RecordEventRequest>,
) -> AppResult<(StatusCode, Json<Ack>)> {
    AnalyticsPipeline::new(&state)
        .record_event(&slug, input)
        .await?;
    Ok((StatusCode::CREATED, Json(Ack { ok: true })))
}

/// POST /api/public/proposals/{slug}/sign
pub async fn sign(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    client: ClientMeta,
    AppJson(input): AppJson<SignRequest>,
) -> AppResult<Json<SignOutcome>> {
    let outcome = SignatureService::new(&state)
        .sign(&slug, &input, &client)
        .await?;
    Ok(Json(outcome))
}
