//! Handlers for account-wide analytics.

use arcdraft_core::analytics::Overview;
use axum::extract::State;
use axum::Json;

use crate::engine::AnalyticsPipeline;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/analytics/overview
pub async fn overview(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Overview>> {
    let overview = AnalyticsPipeline::new(&state)
        .overview(user.account_id)
        .await?;
    Ok(Json(overview))
}
