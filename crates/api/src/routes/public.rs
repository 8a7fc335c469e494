//! Recipient-facing routes. None of these take a token.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public/proposals`.
///
/// ```text
/// GET  /{slug}                  -> get_proposal
/// POST /{slug}/verify-passcode  -> verify_passcode
/// POST /{slug}/events           -> record_event
/// POST /{slug}/sign             -> sign
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(public::get_proposal))
        .route("/{slug}/verify-passcode", post(public::verify_passcode))
        .route("/{slug}/events", post(public::record_event))
        .route("/{slug}/sign", post(public::sign))
}
