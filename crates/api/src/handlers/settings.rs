//! Handlers for the per-account `/settings` singletons.
//!
//! GET returns `{}` until the first PUT. PUT merges: absent fields keep
//! their stored value.

use arcdraft_core::error::CoreError;
use arcdraft_db::models::settings::{
    AutomationSettings, BrandingSettings, SecuritySettings, UpdateAutomation, UpdateBranding,
    UpdateSecurity,
};
use arcdraft_db::store::SettingsStore;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::AppJson;
use crate::state::AppState;

fn or_empty<T: Serialize>(settings: Option<T>) -> AppResult<Json<Value>> {
    let value = match settings {
        Some(settings) => serde_json::to_value(settings)
            .map_err(|e| AppError::InternalError(format!("Failed to serialize settings: {e}")))?,
        None => Value::Object(Default::default()),
    };
    Ok(Json(value))
}

/// GET /api/settings/branding
pub async fn get_branding(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Value>> {
    or_empty(state.store.branding(user.account_id).await?)
}

/// PUT /api/settings/branding
pub async fn update_branding(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<UpdateBranding>,
) -> AppResult<Json<BrandingSettings>> {
    let settings = state
        .store
        .upsert_branding(user.account_id, &input)
        .await?;
    Ok(Json(settings))
}

/// GET /api/settings/security
pub async fn get_security(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Value>> {
    or_empty(state.store.security(user.account_id).await?)
}

/// PUT /api/settings/security
pub async fn update_security(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<UpdateSecurity>,
) -> AppResult<Json<SecuritySettings>> {
    let settings = state
        .store
        .upsert_security(user.account_id, &input)
        .await?;
    Ok(Json(settings))
}

/// GET /api/settings/automation
pub async fn get_automation(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Value>> {
    or_empty(state.store.automation(user.account_id).await?)
}

/// PUT /api/settings/automation
pub async fn update_automation(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<UpdateAutomation>,
) -> AppResult<Json<AutomationSettings>> {
    if let Some(url) = input.webhook_url.as_deref().map(str::trim) {
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(
                CoreError::Validation("webhookUrl: must be an http(s) URL".into()).into(),
            );
        }
    }
    let settings = state
        .store
        .upsert_automation(user.account_id, &input)
        .await?;
    Ok(Json(settings))
}
