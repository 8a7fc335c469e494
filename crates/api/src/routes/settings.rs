//! Route definitions for the `/settings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`. All require auth.
///
/// ```text
/// GET, PUT /branding
/// GET, PUT /security
/// GET, PUT /automation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/branding",
            get(settings::get_branding).put(settings::update_branding),
        )
        .route(
            "/security",
            get(settings::get_security).put(settings::update_security),
        )
        .route(
            "/automation",
            get(settings::get_automation).put(settings::update_automation),
        )
}
