//! Demo account provisioning.

use arcdraft_db::models::account::{Account, CreateAccount};
use arcdraft_db::models::settings::{UpdateAutomation, UpdateBranding, UpdateSecurity};
use arcdraft_db::store::{AccountStore, SettingsStore};
use arcdraft_db::Store;

use crate::auth::password::hash_password;
use crate::config::SeedConfig;
use crate::error::{AppError, AppResult};
use crate::handlers::auth::normalize_email;

pub const DEMO_NAME: &str = "Demo Founder";
pub const DEMO_COMPANY: &str = "ArcDraft Labs";

fn demo_branding() -> UpdateBranding {
    UpdateBranding {
        logo_url: Some("https://dummyimage.com/120x40/0ff/000.png&text=ArcDraft".into()),
        primary_color: Some("#3EF0E7".into()),
        accent_color: Some("#FF6A3D".into()),
        font_family: Some("Inter".into()),
    }
}

/// Create the demo account and its default settings unless the email is
/// already registered.
///
/// Returns the account either way. The automation record gets an API key but
/// no webhook URL, so nothing is posted until the owner configures one.
pub async fn seed_demo_account(store: &dyn Store, seed: &SeedConfig) -> AppResult<Account> {
    let email = normalize_email(&seed.email);
    if let Some(existing) = store.find_account_by_email(&email).await? {
        tracing::debug!(account_id = existing.id, "Demo account already present");
        return Ok(existing);
    }

    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let account = store
        .create_account(&CreateAccount {
            email,
            password_hash,
            name: DEMO_NAME.into(),
            company_name: DEMO_COMPANY.into(),
        })
        .await?;

    store.upsert_branding(account.id, &demo_branding()).await?;
    store
        .upsert_security(
            account.id,
            &UpdateSecurity {
                require_proposal_passcode: Some(false),
                global_passcode: None,
            },
        )
        .await?;
    store
        .upsert_automation(
            account.id,
            &UpdateAutomation {
                webhook_url: None,
                api_key: Some("demo-api-key".into()),
            },
        )
        .await?;

    tracing::info!(account_id = account.id, email = %account.email, "Demo account created");
    Ok(account)
}

#[cfg(test)]
mod tests {
    use arcdraft_db::MemoryStore;

    use super::*;

    fn seed_config() -> SeedConfig {
        SeedConfig {
            enabled: true,
            email: "Demo@ArcDraft.app".into(),
            password: "password123".into(),
        }
    }

    #[tokio::test]
    async fn seeding_twice_keeps_one_account() {
        let store = MemoryStore::new();
        let first = seed_demo_account(&store, &seed_config()).await.unwrap();
        let second = seed_demo_account(&store, &seed_config()).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.email, "demo@arcdraft.app");
        assert_eq!(first.company_name, DEMO_COMPANY);
    }

    #[tokio::test]
    async fn seeds_default_settings() {
        let store = MemoryStore::new();
        let account = seed_demo_account(&store, &seed_config()).await.unwrap();

        let branding = store.branding(account.id).await.unwrap().unwrap();
        assert_eq!(branding.primary_color.as_deref(), Some("#3EF0E7"));
        let security = store.security(account.id).await.unwrap().unwrap();
        assert!(!security.require_proposal_passcode);
        let automation = store.automation(account.id).await.unwrap().unwrap();
        assert!(automation.webhook_url.is_none());
        assert_eq!(automation.api_key.as_deref(), Some("demo-api-key"));
    }
}
