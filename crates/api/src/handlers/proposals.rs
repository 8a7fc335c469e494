//! Handlers for the owner-facing `/proposals` resource.

use arcdraft_core::generation::GenerationRequest;
use arcdraft_core::types::DbId;
use arcdraft_db::models::proposal::Proposal;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::engine::analytics::ProposalAnalytics;
use crate::engine::proposals::ProposalPatch;
use crate::engine::signing::SignatureAudit;
use crate::engine::{AnalyticsPipeline, ProposalEngine, SignatureService};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::json::AppJson;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub proposal_id: DbId,
    pub proposal: Proposal,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// POST /api/proposals/ai-generate
pub async fn generate(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<GenerationRequest>,
) -> AppResult<(StatusCode, Json<GenerateResponse>)> {
    let proposal = ProposalEngine::new(&state)
        .generate(user.account_id, &input)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            proposal_id: proposal.id,
            proposal,
        }),
    ))
}

/// GET /api/proposals?status=
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Proposal>>> {
    let proposals = ProposalEngine::new(&state)
        .list(user.account_id, query.status.as_deref())
        .await?;
    Ok(Json(proposals))
}

/// GET /api/proposals/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Proposal>> {
    let proposal = ProposalEngine::new(&state).get(user.account_id, id).await?;
    Ok(Json(proposal))
}

/// PUT /api/proposals/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(patch): AppJson<ProposalPatch>,
) -> AppResult<Json<Proposal>> {
    let proposal = ProposalEngine::new(&state)
        .update(user.account_id, id, patch)
        .await?;
    Ok(Json(proposal))
}

/// GET /api/proposals/{id}/analytics
pub async fn analytics(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProposalAnalytics>> {
    let summary = AnalyticsPipeline::new(&state)
        .proposal_analytics(user.account_id, id)
        .await?;
    Ok(Json(summary))
}

/// GET /api/proposals/{id}/signature
pub async fn signature_audit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<SignatureAudit>> {
    let audit = SignatureService::new(&state)
        .audit(user.account_id, id)
        .await?;
    Ok(Json(audit))
}
