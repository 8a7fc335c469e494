//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated account behind a Bearer token.
//! - [`client_meta::ClientMeta`] -- client IP and user agent for signature
//!   capture metadata.
//! - [`json::AppJson`] -- JSON request bodies with enveloped rejections.

pub mod auth;
pub mod client_meta;
pub mod json;
