//! Handlers for the `/profile` resource.

use arcdraft_core::error::CoreError;
use arcdraft_db::models::account::{AccountResponse, UpdateAccount};
use arcdraft_db::store::AccountStore;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::{normalize_email, UserEnvelope};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::AppJson;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Non-blank trimmed value, if any.
fn provided(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<UserEnvelope>> {
    let account = state
        .store
        .find_account_by_id(user.account_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Account", user.account_id))?;
    Ok(Json(UserEnvelope {
        user: AccountResponse::from(&account),
    }))
}

/// PUT /api/profile
///
/// Blank fields are ignored. A new password requires the current one.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<UserEnvelope>> {
    let account = state
        .store
        .find_account_by_id(user.account_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Account", user.account_id))?;

    let email = provided(&input.email).map(|e| normalize_email(&e));
    if let Some(email) = &email {
        if !email.contains('@') {
            return Err(CoreError::Validation("email: not a valid address".into()).into());
        }
    }

    let password_hash = match input.new_password.as_deref().filter(|p| !p.is_empty()) {
        None => None,
        Some(new_password) => {
            let current = input.current_password.as_deref().unwrap_or_default();
            let matches = verify_password(current, &account.password_hash).map_err(|e| {
                AppError::InternalError(format!("Password verification error: {e}"))
            })?;
            if !matches {
                return Err(
                    CoreError::Validation("currentPassword: does not match".into()).into(),
                );
            }
            validate_password_strength(new_password, MIN_PASSWORD_LENGTH)
                .map_err(CoreError::Validation)?;
            Some(
                hash_password(new_password)
                    .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
            )
        }
    };

    let updates = UpdateAccount {
        email,
        password_hash,
        name: provided(&input.name),
        company_name: provided(&input.company_name),
    };

    let updated = state
        .store
        .update_account(account.id, &updates)
        .await?
        .ok_or_else(|| CoreError::not_found("Account", account.id))?;

    tracing::info!(account_id = updated.id, "Profile updated");
    Ok(Json(UserEnvelope {
        user: AccountResponse::from(&updated),
    }))
}
