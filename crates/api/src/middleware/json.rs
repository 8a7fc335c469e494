//! JSON body extractor whose rejections use the API error envelope.

use arcdraft_core::error::CoreError;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::AppError;

/// Drop-in for [`axum::Json`] on request bodies.
///
/// Malformed or mistyped bodies become `400 VALIDATION_ERROR` in the usual
/// `{"error", "code"}` shape instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}
