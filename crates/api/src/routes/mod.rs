pub mod analytics;
pub mod auth;
pub mod health;
pub mod profile;
pub mod proposals;
pub mod public;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                   login (public)
/// /auth/me                                      current account
///
/// /profile                                      get, update
///
/// /proposals                                    list (?status=)
/// /proposals/ai-generate                        generate (POST)
/// /proposals/{id}                               get, update
/// /proposals/{id}/analytics                     engagement summary
/// /proposals/{id}/signature                     signature audit
///
/// /analytics/overview                           account-wide metrics
///
/// /settings/branding                            get, update
/// /settings/security                            get, update
/// /settings/automation                          get, update
///
/// /public/proposals/{slug}                      recipient view (no auth)
/// /public/proposals/{slug}/verify-passcode      unlock (POST)
/// /public/proposals/{slug}/events               record event (POST)
/// /public/proposals/{slug}/sign                 sign (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/proposals", proposals::router())
        .nest("/analytics", analytics::router())
        .nest("/settings", settings::router())
        .nest("/public/proposals", public::router())
}
