//! The storage interface injected into the engine.
//!
//! Each trait groups the operations of one aggregate. [`Store`] is the
//! union of all of them and is what application state holds as
//! `Arc<dyn Store>`. Lists are returned in insertion order.

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

/// Unique constraint names, shared by both store implementations.
pub mod constraints {
    pub const ACCOUNT_EMAIL: &str = "uq_accounts_email";
    pub const PROPOSAL_PUBLIC_SLUG: &str = "uq_proposals_public_slug";
    pub const SIGNATURE_PROPOSAL: &str = "uq_signatures_proposal_id";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint rejected the write; carries the constraint name.
    #[error("Duplicate value violates unique constraint: {0}")]
    Duplicate(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_account(&self, input: &CreateAccount) -> StoreResult<Account>;

    async fn find_account_by_id(&self, id: DbId) -> StoreResult<Option<Account>>;

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Returns `None` if no account with `id` exists.
    async fn update_account(&self, id: DbId, input: &UpdateAccount)
        -> StoreResult<Option<Account>>;
}

#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Insert a `draft` proposal. Fails with [`StoreError::Duplicate`] when the
    /// public slug is already taken.
    async fn insert_proposal(&self, input: &NewProposal) -> StoreResult<Proposal>;

    async fn find_proposal(&self, id: DbId) -> StoreResult<Option<Proposal>>;

    async fn find_proposal_by_slug(&self, slug: &str) -> StoreResult<Option<Proposal>>;

    async fn list_proposals_for_owner(
        &self,
        owner_id: DbId,
        status: Option<ProposalStatus>,
    ) -> StoreResult<Vec<Proposal>>;

    /// Persist the mutable fields of `proposal` (title, status, sections,
    /// recipient, passcode, signed/viewed/updated timestamps).
    ///
    /// Returns `None` if the proposal no longer exists.
    async fn save_proposal(&self, proposal: &Proposal) -> StoreResult<Option<Proposal>>;
}

#[async_trait]
pub trait SignatureStore: Send + Sync {
    /// Atomically write the signature, the signed proposal, and the `signed`
    /// analytics event. Fails with [`StoreError::Duplicate`] when the proposal
    /// already has a signature; nothing is written in that case.
    async fn record_signing(
        &self,
        signature: &NewSignature,
        proposal: &Proposal,
        event: &NewAnalyticsEvent,
    ) -> StoreResult<Signature>;

    async fn find_signature_for_proposal(&self, proposal_id: DbId)
        -> StoreResult<Option<Signature>>;

    async fn list_signatures_for_proposal(&self, proposal_id: DbId) -> StoreResult<Vec<Signature>>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn append_event(&self, input: &NewAnalyticsEvent) -> StoreResult<AnalyticsEvent>;

    async fn list_events_for_proposal(&self, proposal_id: DbId)
        -> StoreResult<Vec<AnalyticsEvent>>;

    /// Count events of `event_type` on proposals owned by `owner_id` with
    /// `created_at >= since`.
    async fn count_owner_events_since(
        &self,
        owner_id: DbId,
        event_type: &str,
        since: Timestamp,
    ) -> StoreResult<usize>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn branding(&self, owner_id: DbId) -> StoreResult<Option<BrandingSettings>>;

    async fn upsert_branding(
        &self,
        owner_id: DbId,
        input: &UpdateBranding,
    ) -> StoreResult<BrandingSettings>;

    async fn security(&self, owner_id: DbId) -> StoreResult<Option<SecuritySettings>>;

    async fn upsert_security(
        &self,
        owner_id: DbId,
        input: &UpdateSecurity,
    ) -> StoreResult<SecuritySettings>;

    async fn automation(&self, owner_id: DbId) -> StoreResult<Option<AutomationSettings>>;

    async fn upsert_automation(
        &self,
        owner_id: DbId,
        input: &UpdateAutomation,
    ) -> StoreResult<AutomationSettings>;
}

/// Everything the application needs from storage.
pub trait Store: AccountStore + ProposalStore + SignatureStore + EventStore + SettingsStore {}

impl<T> Store for T where
    T: AccountStore + ProposalStore + SignatureStore + EventStore + SettingsStore
{
}
