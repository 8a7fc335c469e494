//! Process-local [`Store`](crate::store::Store) implementation.
//!
//! All state sits behind a single `RwLock`, so every read sees a consistent
//! snapshot and multi-entity writes (`record_signing`) are atomic. Entities
//! are kept in `Vec`s, which preserves insertion order for listings.

use std::collections::HashMap;

use arcdraft_core::proposal::ProposalStatus;
use arcdraft_core::types::{DbId, Timestamp};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::account::{Account, CreateAccount, UpdateAccount};
use crate::models::analytics_event::{AnalyticsEvent, NewAnalyticsEvent};
use crate::models::proposal::{NewProposal, Proposal};
use crate::models::settings::{
    AutomationSettings, BrandingSettings, SecuritySettings, UpdateAutomation, UpdateBranding,
    UpdateSecurity,
};
use crate::models::signature::{NewSignature, Signature};
use crate::store::{
    constraints, AccountStore, EventStore, ProposalStore, SettingsStore, SignatureStore,
    StoreError, StoreResult,
};

#[derive(Default)]
struct State {
    next_id: DbId,
    accounts: Vec<Account>,
    proposals: Vec<Proposal>,
    signatures: Vec<Signature>,
    events: Vec<AnalyticsEvent>,
    branding: HashMap<DbId, BrandingSettings>,
    security: HashMap<DbId, SecuritySettings>,
    automation: HashMap<DbId, AutomationSettings>,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn push_event(&mut self, input: &NewAnalyticsEvent) -> AnalyticsEvent {
        let event = AnalyticsEvent {
            id: self.next_id(),
            proposal_id: input.proposal_id,
            event_type: input.event_type.clone(),
            metadata: input.metadata.clone(),
            created_at: input.created_at,
        };
        self.events.push(event.clone());
        event
    }

    fn replace_proposal(&mut self, proposal: &Proposal) -> Option<Proposal> {
        let slot = self.proposals.iter_mut().find(|p| p.id == proposal.id)?;
        // Identity fields are immutable; only the mutable columns are copied.
        slot.title = proposal.title.clone();
        slot.status = proposal.status;
        slot.sections = proposal.sections.clone();
        slot.recipient = proposal.recipient.clone();
        slot.passcode = proposal.passcode.clone();
        slot.signed_at = proposal.signed_at;
        slot.viewed_at = proposal.viewed_at;
        slot.updated_at = proposal.updated_at;
        Some(slot.clone())
    }
}

/// In-memory store. Data does not survive a restart.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, input: &CreateAccount) -> StoreResult<Account> {
        let mut state = self.state.write().await;
        if state.accounts.iter().any(|a| a.email == input.email) {
            return Err(StoreError::Duplicate(constraints::ACCOUNT_EMAIL.into()));
        }
        let now = Utc::now();
        let account = Account {
            id: state.next_id(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            name: input.name.clone(),
            company_name: input.company_name.clone(),
            created_at: now,
            updated_at: now,
        };
        state.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_account_by_id(&self, id: DbId) -> StoreResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn update_account(
        &self,
        id: DbId,
        input: &UpdateAccount,
    ) -> StoreResult<Option<Account>> {
        let mut state = self.state.write().await;
        if let Some(email) = &input.email {
            if state.accounts.iter().any(|a| a.id != id && &a.email == email) {
                return Err(StoreError::Duplicate(constraints::ACCOUNT_EMAIL.into()));
            }
        }
        let Some(account) = state.accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(email) = &input.email {
            account.email = email.clone();
        }
        if let Some(hash) = &input.password_hash {
            account.password_hash = hash.clone();
        }
        if let Some(name) = &input.name {
            account.name = name.clone();
        }
        if let Some(company) = &input.company_name {
            account.company_name = company.clone();
        }
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }
}

#[async_trait]
impl ProposalStore for MemoryStore {
    async fn insert_proposal(&self, input: &NewProposal) -> StoreResult<Proposal> {
        let mut state = self.state.write().await;
        if state
            .proposals
            .iter()
            .any(|p| p.public_slug == input.public_slug)
        {
            return Err(StoreError::Duplicate(
                constraints::PROPOSAL_PUBLIC_SLUG.into(),
            ));
        }
        let now = Utc::now();
        let proposal = Proposal {
            id: state.next_id(),
            owner_id: input.owner_id,
            title: input.title.clone(),
            template_id: input.template_id.clone(),
            status: ProposalStatus::Draft,
            sections: input.sections.clone(),
            recipient: input.recipient.clone(),
            generation_source: input.generation_source.clone(),
            public_slug: input.public_slug.clone(),
            passcode: input.passcode.clone(),
            signed_at: None,
            viewed_at: None,
            created_at: now,
            updated_at: now,
        };
        state.proposals.push(proposal.clone());
        Ok(proposal)
    }

    async fn find_proposal(&self, id: DbId) -> StoreResult<Option<Proposal>> {
        let state = self.state.read().await;
        Ok(state.proposals.iter().find(|p| p.id == id).cloned())
    }

    async fn find_proposal_by_slug(&self, slug: &str) -> StoreResult<Option<Proposal>> {
        let state = self.state.read().await;
        Ok(state
            .proposals
            .iter()
            .find(|p| p.public_slug == slug)
            .cloned())
    }

    async fn list_proposals_for_owner(
        &self,
        owner_id: DbId,
        status: Option<ProposalStatus>,
    ) -> StoreResult<Vec<Proposal>> {
        let state = self.state.read().await;
        Ok(state
            .proposals
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect())
    }

    async fn save_proposal(&self, proposal: &Proposal) -> StoreResult<Option<Proposal>> {
        let mut state = self.state.write().await;
        Ok(state.replace_proposal(proposal))
    }
}

#[async_trait]
impl SignatureStore for MemoryStore {
    async fn record_signing(
        &self,
        signature: &NewSignature,
        proposal: &Proposal,
        event: &NewAnalyticsEvent,
    ) -> StoreResult<Signature> {
        let mut state = self.state.write().await;
        if state
            .signatures
            .iter()
            .any(|s| s.proposal_id == signature.proposal_id)
        {
            return Err(StoreError::Duplicate(
                constraints::SIGNATURE_PROPOSAL.into(),
            ));
        }
        if !state.proposals.iter().any(|p| p.id == proposal.id) {
            return Err(StoreError::Database(sqlx::Error::RowNotFound));
        }

        let record = Signature {
            id: state.next_id(),
            proposal_id: signature.proposal_id,
            signer_name: signature.signer_name.clone(),
            signer_email: signature.signer_email.clone(),
            signed_at: signature.signed_at,
            signer_ip: signature.signer_ip.clone(),
            user_agent: signature.user_agent.clone(),
            signature_type: signature.signature_type,
            signature_data: signature.signature_data.clone(),
            proposal_content_hash: signature.proposal_content_hash.clone(),
        };
        state.signatures.push(record.clone());
        state.replace_proposal(proposal);
        state.push_event(event);
        Ok(record)
    }

    async fn find_signature_for_proposal(
        &self,
        proposal_id: DbId,
    ) -> StoreResult<Option<Signature>> {
        let state = self.state.read().await;
        Ok(state
            .signatures
            .iter()
            .find(|s| s.proposal_id == proposal_id)
            .cloned())
    }

    async fn list_signatures_for_proposal(&self, proposal_id: DbId) -> StoreResult<Vec<Signature>> {
        let state = self.state.read().await;
        Ok(state
            .signatures
            .iter()
            .filter(|s| s.proposal_id == proposal_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn append_event(&self, input: &NewAnalyticsEvent) -> StoreResult<AnalyticsEvent> {
        let mut state = self.state.write().await;
        Ok(state.push_event(input))
    }

    async fn list_events_for_proposal(
        &self,
        proposal_id: DbId,
    ) -> StoreResult<Vec<AnalyticsEvent>> {
        let state = self.state.read().await;
        Ok(state
            .events
            .iter()
            .filter(|e| e.proposal_id == proposal_id)
            .cloned()
            .collect())
    }

    async fn count_owner_events_since(
        &self,
        owner_id: DbId,
        event_type: &str,
        since: Timestamp,
    ) -> StoreResult<usize> {
        let state = self.state.read().await;
        let owned: Vec<DbId> = state
            .proposals
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .map(|p| p.id)
            .collect();
        Ok(state
            .events
            .iter()
            .filter(|e| e.event_type == event_type && e.created_at >= since)
            .filter(|e| owned.contains(&e.proposal_id))
            .count())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn branding(&self, owner_id: DbId) -> StoreResult<Option<BrandingSettings>> {
        Ok(self.state.read().await.branding.get(&owner_id).cloned())
    }

    async fn upsert_branding(
        &self,
        owner_id: DbId,
        input: &UpdateBranding,
    ) -> StoreResult<BrandingSettings> {
        let mut state = self.state.write().await;
        let entry = state
            .branding
            .entry(owner_id)
            .or_insert_with(|| BrandingSettings {
                owner_id,
                logo_url: None,
                primary_color: None,
                accent_color: None,
                font_family: None,
                updated_at: Utc::now(),
            });
        merge(&mut entry.logo_url, &input.logo_url);
        merge(&mut entry.primary_color, &input.primary_color);
        merge(&mut entry.accent_color, &input.accent_color);
        merge(&mut entry.font_family, &input.font_family);
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn security(&self, owner_id: DbId) -> StoreResult<Option<SecuritySettings>> {
        Ok(self.state.read().await.security.get(&owner_id).cloned())
    }

    async fn upsert_security(
        &self,
        owner_id: DbId,
        input: &UpdateSecurity,
    ) -> StoreResult<SecuritySettings> {
        let mut state = self.state.write().await;
        let entry = state
            .security
            .entry(owner_id)
            .or_insert_with(|| SecuritySettings {
                owner_id,
                require_proposal_passcode: false,
                global_passcode: None,
                updated_at: Utc::now(),
            });
        if let Some(required) = input.require_proposal_passcode {
            entry.require_proposal_passcode = required;
        }
        merge(&mut entry.global_passcode, &input.global_passcode);
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn automation(&self, owner_id: DbId) -> StoreResult<Option<AutomationSettings>> {
        Ok(self.state.read().await.automation.get(&owner_id).cloned())
    }

    async fn upsert_automation(
        &self,
        owner_id: DbId,
        input: &UpdateAutomation,
    ) -> StoreResult<AutomationSettings> {
        let mut state = self.state.write().await;
        let entry = state
            .automation
            .entry(owner_id)
            .or_insert_with(|| AutomationSettings {
                owner_id,
                webhook_url: None,
                api_key: None,
                updated_at: Utc::now(),
            });
        merge(&mut entry.webhook_url, &input.webhook_url);
        merge(&mut entry.api_key, &input.api_key);
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }
}

fn merge(slot: &mut Option<String>, update: &Option<String>) {
    if let Some(value) = update {
        *slot = Some(value.clone());
    }
}
