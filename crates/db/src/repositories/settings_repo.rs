//! Repository for the per-account settings tables.
//!
//! Each table holds at most one row per owner. Upserts merge: a `NULL`
//! parameter keeps the stored value.

use arcdraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::settings::{
    AutomationSettings, BrandingSettings, SecuritySettings, UpdateAutomation, UpdateBranding,
    UpdateSecurity,
};

const BRANDING_COLUMNS: &str =
    "owner_id, logo_url, primary_color, accent_color, font_family, updated_at";
const SECURITY_COLUMNS: &str = "owner_id, require_proposal_passcode, global_passcode, updated_at";
const AUTOMATION_COLUMNS: &str = "owner_id, webhook_url, api_key, updated_at";

pub struct SettingsRepo;

impl SettingsRepo {
    // -----------------------------------------------------------------------
    // Branding
    // -----------------------------------------------------------------------

    pub async fn find_branding(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Option<BrandingSettings>, sqlx::Error> {
        let query = format!("SELECT {BRANDING_COLUMNS} FROM branding_settings WHERE owner_id = $1");
        sqlx::query_as::<_, BrandingSettings>(&query)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn upsert_branding(
        pool: &PgPool,
        owner_id: DbId,
        input: &UpdateBranding,
    ) -> Result<BrandingSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO branding_settings \
                (owner_id, logo_url, primary_color, accent_color, font_family) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (owner_id) DO UPDATE SET \
                logo_url = COALESCE($2, branding_settings.logo_url), \
                primary_color = COALESCE($3, branding_settings.primary_color), \
                accent_color = COALESCE($4, branding_settings.accent_color), \
                font_family = COALESCE($5, branding_settings.font_family), \
                updated_at = NOW() \
             RETURNING {BRANDING_COLUMNS}"
        );
        sqlx::query_as::<_, BrandingSettings>(&query)
            .bind(owner_id)
            .bind(&input.logo_url)
            .bind(&input.primary_color)
            .bind(&input.accent_color)
            .bind(&input.font_family)
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Security
    // -----------------------------------------------------------------------

    pub async fn find_security(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Option<SecuritySettings>, sqlx::Error> {
        let query = format!("SELECT {SECURITY_COLUMNS} FROM security_settings WHERE owner_id = $1");
        sqlx::query_as::<_, SecuritySettings>(&query)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn upsert_security(
        pool: &PgPool,
        owner_id: DbId,
        input: &UpdateSecurity,
    ) -> Result<SecuritySettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO security_settings (owner_id, require_proposal_passcode, global_passcode) \
             VALUES ($1, COALESCE($2, false), $3) \
             ON CONFLICT (owner_id) DO UPDATE SET \
                require_proposal_passcode = \
                    COALESCE($2, security_settings.require_proposal_passcode), \
                global_passcode = COALESCE($3, security_settings.global_passcode), \
                updated_at = NOW() \
             RETURNING {SECURITY_COLUMNS}"
        );
        sqlx::query_as::<_, SecuritySettings>(&query)
            .bind(owner_id)
            .bind(input.require_proposal_passcode)
            .bind(&input.global_passcode)
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Automation
    // -----------------------------------------------------------------------

    pub async fn find_automation(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Option<AutomationSettings>, sqlx::Error> {
        let query =
            format!("SELECT {AUTOMATION_COLUMNS} FROM automation_settings WHERE owner_id = $1");
        sqlx::query_as::<_, AutomationSettings>(&query)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn upsert_automation(
        pool: &PgPool,
        owner_id: DbId,
        input: &UpdateAutomation,
    ) -> Result<AutomationSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO automation_settings (owner_id, webhook_url, api_key) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (owner_id) DO UPDATE SET \
                webhook_url = COALESCE($2, automation_settings.webhook_url), \
                api_key = COALESCE($3, automation_settings.api_key), \
                updated_at = NOW() \
             RETURNING {AUTOMATION_COLUMNS}"
        );
        sqlx::query_as::<_, AutomationSettings>(&query)
            .bind(owner_id)
            .bind(&input.webhook_url)
            .bind(&input.api_key)
            .fetch_one(pool)
            .await
    }
}
