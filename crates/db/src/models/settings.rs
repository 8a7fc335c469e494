//! Per-account settings singletons (branding, security, automation).
//!
//! Updates are partial merges: `None` fields keep their stored value.

use arcdraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Branding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingSettings {
    pub owner_id: DbId,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub font_family: Option<String>,
    pub updated_at: Timestamp,
}

/// Branding as shown next to a public proposal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBranding {
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub font_family: Option<String>,
}

impl From<BrandingSettings> for PublicBranding {
    fn from(b: BrandingSettings) -> Self {
        Self {
            logo_url: b.logo_url,
            primary_color: b.primary_color,
            accent_color: b.accent_color,
            font_family: b.font_family,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBranding {
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub font_family: Option<String>,
}

// ---------------------------------------------------------------------------
// Security
// ---------------------------------------------------------------------------

/// Passcode policy. Stored and served, not yet applied to new proposals.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    pub owner_id: DbId,
    pub require_proposal_passcode: bool,
    pub global_passcode: Option<String>,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSecurity {
    pub require_proposal_passcode: Option<bool>,
    pub global_passcode: Option<String>,
}

// ---------------------------------------------------------------------------
// Automation
// ---------------------------------------------------------------------------

/// Outbound webhook used for integration notifications.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationSettings {
    pub owner_id: DbId,
    pub webhook_url: Option<String>,
    pub api_key: Option<String>,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAutomation {
    pub webhook_url: Option<String>,
    pub api_key: Option<String>,
}
