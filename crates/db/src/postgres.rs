//! PostgreSQL-backed [`Store`](crate::store::Store).

use arcdraft_core::proposal::ProposalStatus;
use arcdraft_core::types::{DbId, Timestamp};
use async_trait::async_trait;

use crate::models::account::{Account, CreateAccount, UpdateAccount};
use crate::models::analytics_event::{AnalyticsEvent, NewAnalyticsEvent};
use crate::models::proposal::{NewProposal, Proposal};
use crate::models::settings::{
    AutomationSettings, BrandingSettings, SecuritySettings, UpdateAutomation, UpdateBranding,
    UpdateSecurity,
};
use crate::models::signature::{NewSignature, Signature};
use crate::repositories::{
    AccountRepo, AnalyticsEventRepo, ProposalRepo, SettingsRepo, SignatureRepo,
};
use crate::store::{
    AccountStore, EventStore, ProposalStore, SettingsStore, SignatureStore, StoreError,
    StoreResult,
};
use crate::DbPool;

/// PostgreSQL error code for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Map unique violations to [`StoreError::Duplicate`]; pass everything else through.
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            return StoreError::Duplicate(constraint);
        }
    }
    StoreError::Database(err)
}

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_account(&self, input: &CreateAccount) -> StoreResult<Account> {
        AccountRepo::create(&self.pool, input).await.map_err(classify)
    }

    async fn find_account_by_id(&self, id: DbId) -> StoreResult<Option<Account>> {
        Ok(AccountRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(AccountRepo::find_by_email(&self.pool, email).await?)
    }

    async fn update_account(
        &self,
        id: DbId,
        input: &UpdateAccount,
    ) -> StoreResult<Option<Account>> {
        AccountRepo::update(&self.pool, id, input)
            .await
            .map_err(classify)
    }
}

#[async_trait]
impl ProposalStore for PgStore {
    async fn insert_proposal(&self, input: &NewProposal) -> StoreResult<Proposal> {
        ProposalRepo::create(&self.pool, input)
            .await
            .map_err(classify)
    }

    async fn find_proposal(&self, id: DbId) -> StoreResult<Option<Proposal>> {
        Ok(ProposalRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_proposal_by_slug(&self, slug: &str) -> StoreResult<Option<Proposal>> {
        Ok(ProposalRepo::find_by_slug(&self.pool, slug).await?)
    }

    async fn list_proposals_for_owner(
        &self,
        owner_id: DbId,
        status: Option<ProposalStatus>,
    ) -> StoreResult<Vec<Proposal>> {
        Ok(ProposalRepo::list_by_owner(&self.pool, owner_id, status).await?)
    }

    async fn save_proposal(&self, proposal: &Proposal) -> StoreResult<Option<Proposal>> {
        Ok(ProposalRepo::save(&self.pool, proposal).await?)
    }
}

#[async_trait]
impl SignatureStore for PgStore {
    async fn record_signing(
        &self,
        signature: &NewSignature,
        proposal: &Proposal,
        event: &NewAnalyticsEvent,
    ) -> StoreResult<Signature> {
        SignatureRepo::record_signing(&self.pool, signature, proposal, event)
            .await
            .map_err(classify)
    }

    async fn find_signature_for_proposal(
        &self,
        proposal_id: DbId,
    ) -> StoreResult<Option<Signature>> {
        Ok(SignatureRepo::find_by_proposal(&self.pool, proposal_id).await?)
    }

    async fn list_signatures_for_proposal(&self, proposal_id: DbId) -> StoreResult<Vec<Signature>> {
        Ok(SignatureRepo::list_by_proposal(&self.pool, proposal_id).await?)
    }
}

#[async_trait]
impl EventStore for PgStore {
    async fn append_event(&self, input: &NewAnalyticsEvent) -> StoreResult<AnalyticsEvent> {
        Ok(AnalyticsEventRepo::create(&self.pool, input).await?)
    }

    async fn list_events_for_proposal(
        &self,
        proposal_id: DbId,
    ) -> StoreResult<Vec<AnalyticsEvent>> {
        Ok(AnalyticsEventRepo::list_by_proposal(&self.pool, proposal_id).await?)
    }

    async fn count_owner_events_since(
        &self,
        owner_id: DbId,
        event_type: &str,
        since: Timestamp,
    ) -> StoreResult<usize> {
        let count =
            AnalyticsEventRepo::count_for_owner_since(&self.pool, owner_id, event_type, since)
                .await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn branding(&self, owner_id: DbId) -> StoreResult<Option<BrandingSettings>> {
        Ok(SettingsRepo::find_branding(&self.pool, owner_id).await?)
    }

    async fn upsert_branding(
        &self,
        owner_id: DbId,
        input: &UpdateBranding,
    ) -> StoreResult<BrandingSettings> {
        Ok(SettingsRepo::upsert_branding(&self.pool, owner_id, input).await?)
    }

    async fn security(&self, owner_id: DbId) -> StoreResult<Option<SecuritySettings>> {
        Ok(SettingsRepo::find_security(&self.pool, owner_id).await?)
    }

    async fn upsert_security(
        &self,
        owner_id: DbId,
        input: &UpdateSecurity,
    ) -> StoreResult<SecuritySettings> {
        Ok(SettingsRepo::upsert_security(&self.pool, owner_id, input).await?)
    }

    async fn automation(&self, owner_id: DbId) -> StoreResult<Option<AutomationSettings>> {
        Ok(SettingsRepo::find_automation(&self.pool, owner_id).await?)
    }

    async fn upsert_automation(
        &self,
        owner_id: DbId,
        input: &UpdateAutomation,
    ) -> StoreResult<AutomationSettings> {
        Ok(SettingsRepo::upsert_automation(&self.pool, owner_id, input).await?)
    }
}
