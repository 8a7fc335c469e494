//! Route definitions for the owner-facing `/proposals` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::proposals;
use crate::state::AppState;

/// Routes mounted at `/proposals`. All require auth.
///
/// ```text
/// GET  /                  -> list
/// POST /ai-generate       -> generate
/// GET  /{id}              -> get
/// PUT  /{id}              -> update
/// GET  /{id}/analytics    -> analytics
/// GET  /{id}/signature    -> signature_audit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(proposals::list))
        .route("/ai-generate", post(proposals::generate))
        .route("/{id}", get(proposals::get).put(proposals::update))
        .route("/{id}/analytics", get(proposals::analytics))
        .route("/{id}/signature", get(proposals::signature_audit))
}
