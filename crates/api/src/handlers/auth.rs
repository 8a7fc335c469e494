//! Handlers for the `/auth` resource.

use arcdraft_core::error::CoreError;
use arcdraft_db::models::account::AccountResponse;
use arcdraft_db::store::AccountStore;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::AppJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AccountResponse,
}

/// `{ "user": ... }` envelope shared by `/auth/me` and `/profile`.
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: AccountResponse,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid credentials".into()))
}

/// Emails are compared trimmed and case-insensitively.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let account = state
        .store
        .find_account_by_email(&normalize_email(&input.email))
        .await?
        .ok_or_else(invalid_credentials)?;

    let valid = verify_password(&input.password, &account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(invalid_credentials());
    }

    let token = generate_token(account.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(account_id = account.id, "Login succeeded");
    Ok(Json(LoginResponse {
        token,
        user: AccountResponse::from(&account),
    }))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<UserEnvelope>> {
    let account = state
        .store
        .find_account_by_id(user.account_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Account", user.account_id))?;
    Ok(Json(UserEnvelope {
        user: AccountResponse::from(&account),
    }))
}
