//! Proposal creation, owner reads and updates, and the public read contract.

use arcdraft_core::error::CoreError;
use arcdraft_core::generation::{generate, GenerationRequest};
use arcdraft_core::proposal::{ProposalStatus, Recipient, Section};
use arcdraft_core::public_link::{generate_public_slug, passcode_matches};
use arcdraft_core::types::DbId;
use arcdraft_db::models::proposal::{NewProposal, Proposal, PublicProposal};
use arcdraft_db::models::settings::PublicBranding;
use arcdraft_db::store::{constraints, ProposalStore, SettingsStore};
use arcdraft_db::{Store, StoreError};
use arcdraft_events::bus::names;
use arcdraft_events::{EventBus, IntegrationEvent};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::engine::locks::ProposalLocks;
use crate::engine::{owned_proposal, proposal_by_slug};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Fresh slugs tried before giving up on a run of collisions.
const MAX_SLUG_ATTEMPTS: usize = 5;

/// Owner-editable proposal fields. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalPatch {
    pub title: Option<String>,
    pub sections: Option<Vec<Section>>,
    pub recipient: Option<Recipient>,
    /// An empty string removes the passcode.
    pub passcode: Option<String>,
    pub status: Option<String>,
}

/// What a recipient sees for an unlocked proposal.
#[derive(Debug, Clone, Serialize)]
pub struct PublicPayload {
    pub proposal: PublicProposal,
    pub branding: Option<PublicBranding>,
}

/// Answer to a public read of a passcode-protected proposal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasscodeRequired {
    pub requires_passcode: bool,
    pub proposal_id: DbId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PublicView {
    Locked(PasscodeRequired),
    Open(PublicPayload),
}

pub struct ProposalEngine<'a> {
    store: &'a dyn Store,
    events: &'a EventBus,
    locks: &'a ProposalLocks,
}

impl<'a> ProposalEngine<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            store: state.store.as_ref(),
            events: state.event_bus.as_ref(),
            locks: state.locks.as_ref(),
        }
    }

    /// Create a `draft` proposal from a generation request.
    pub async fn generate(&self, owner_id: DbId, request: &GenerationRequest) -> AppResult<Proposal> {
        let draft = generate(request)?;
        let passcode = request.normalized_passcode();

        let mut attempts = 0;
        let proposal = loop {
            attempts += 1;
            let input = NewProposal {
                owner_id,
                title: draft.title.clone(),
                template_id: request.template_id.clone(),
                sections: draft.sections.clone(),
                recipient: draft.recipient.clone(),
                generation_source: draft.source.clone(),
                public_slug: generate_public_slug(),
                passcode: passcode.clone(),
            };
            match self.store.insert_proposal(&input).await {
                Ok(proposal) => break proposal,
                Err(StoreError::Duplicate(constraint))
                    if constraint == constraints::PROPOSAL_PUBLIC_SLUG
                        && attempts < MAX_SLUG_ATTEMPTS =>
                {
                    tracing::warn!(attempts, "Public slug collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        };

        tracing::info!(
            proposal_id = proposal.id,
            owner_id,
            "Proposal generated"
        );
        self.events.publish(IntegrationEvent::new(
            names::PROPOSAL_GENERATED,
            proposal.id,
            owner_id,
        ));
        Ok(proposal)
    }

    /// Owner's proposals in creation order.
    ///
    /// The filter is an exact status match, so an unknown status simply
    /// matches nothing.
    pub async fn list(&self, owner_id: DbId, status: Option<&str>) -> AppResult<Vec<Proposal>> {
        let status = match status {
            None => None,
            Some(raw) => match raw.parse::<ProposalStatus>() {
                Ok(status) => Some(status),
                Err(_) => return Ok(Vec::new()),
            },
        };
        Ok(self.store.list_proposals_for_owner(owner_id, status).await?)
    }

    pub async fn get(&self, owner_id: DbId, proposal_id: DbId) -> AppResult<Proposal> {
        owned_proposal(self.store, owner_id, proposal_id).await
    }

    /// Apply `patch` under the proposal's lock.
    ///
    /// Emits `proposal.sent` when the patch sets status `sent`.
    pub async fn update(
        &self,
        owner_id: DbId,
        proposal_id: DbId,
        patch: ProposalPatch,
    ) -> AppResult<Proposal> {
        let next_status = patch
            .status
            .as_deref()
            .map(|raw| {
                raw.parse::<ProposalStatus>()
                    .map_err(|e| CoreError::Validation(format!("status: {e}")))
            })
            .transpose()?;
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(CoreError::Validation("title must not be blank".into()).into());
            }
        }

        let _guard = self.locks.acquire(proposal_id).await;
        let mut proposal = owned_proposal(self.store, owner_id, proposal_id).await?;

        if let Some(next) = next_status {
            proposal.status.check_manual_change(next)?;
            proposal.status = next;
        }
        if let Some(title) = patch.title {
            proposal.title = title.trim().to_string();
        }
        if let Some(sections) = patch.sections {
            proposal.sections = sections;
        }
        if let Some(recipient) = patch.recipient {
            proposal.recipient = recipient;
        }
        if let Some(passcode) = patch.passcode {
            let passcode = passcode.trim();
            proposal.passcode = (!passcode.is_empty()).then(|| passcode.to_string());
        }
        proposal.updated_at = Utc::now();

        let saved = self
            .store
            .save_proposal(&proposal)
            .await?
            .ok_or_else(|| CoreError::not_found("Proposal", proposal_id))?;

        if next_status == Some(ProposalStatus::Sent) {
            tracing::info!(proposal_id, owner_id, "Proposal sent");
            self.events.publish(IntegrationEvent::new(
                names::PROPOSAL_SENT,
                proposal_id,
                owner_id,
            ));
        }
        Ok(saved)
    }

    /// Public read by slug. Protected proposals reveal only their id.
    pub async fn public_get(&self, slug: &str) -> AppResult<PublicView> {
        let proposal = proposal_by_slug(self.store, slug).await?;
        if proposal.passcode.is_some() {
            return Ok(PublicView::Locked(PasscodeRequired {
                requires_passcode: true,
                proposal_id: proposal.id,
            }));
        }
        Ok(PublicView::Open(self.public_payload(&proposal).await?))
    }

    /// Unlock a protected proposal. Unprotected proposals cannot be unlocked.
    pub async fn verify_passcode(&self, slug: &str, candidate: &str) -> AppResult<PublicPayload> {
        let proposal = proposal_by_slug(self.store, slug).await?;
        if !passcode_matches(proposal.passcode.as_deref(), candidate) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid passcode".into(),
            )));
        }
        self.public_payload(&proposal).await
    }

    pub(crate) async fn public_payload(&self, proposal: &Proposal) -> AppResult<PublicPayload> {
        let branding = self
            .store
            .branding(proposal.owner_id)
            .await?
            .map(PublicBranding::from);
        Ok(PublicPayload {
            proposal: PublicProposal::from(proposal),
            branding,
        })
    }
}
