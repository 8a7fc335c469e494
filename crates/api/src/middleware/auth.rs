//! JWT-based authentication extractor.

use arcdraft_core::error::CoreError;
use arcdraft_core::types::DbId;
use arcdraft_db::store::AccountStore;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The account behind a valid `Authorization: Bearer <jwt>` header.
///
/// Besides checking signature and expiry, the extractor confirms that the
/// account still exists. That lookup is the only store access.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub account_id: DbId,
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        state
            .store
            .find_account_by_id(claims.sub)
            .await?
            .ok_or_else(|| unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            account_id: claims.sub,
        })
    }
}
