//! Signature capture and integrity audit.

use arcdraft_core::analytics::{EVENT_SIGNED, META_SIGNER_NAME};
use arcdraft_core::error::CoreError;
use arcdraft_core::proposal::ProposalStatus;
use arcdraft_core::signature::{content_hash, SignRequest};
use arcdraft_core::types::DbId;
use arcdraft_db::models::analytics_event::NewAnalyticsEvent;
use arcdraft_db::models::proposal::PublicProposal;
use arcdraft_db::models::signature::{NewSignature, Signature};
use arcdraft_db::store::{constraints, ProposalStore, SignatureStore};
use arcdraft_db::{Store, StoreError};
use arcdraft_events::bus::names;
use arcdraft_events::{EventBus, IntegrationEvent};
use chrono::Utc;
use serde::Serialize;

use crate::engine::locks::ProposalLocks;
use crate::engine::{owned_proposal, proposal_by_slug};
use crate::error::{AppError, AppResult};
use crate::middleware::client_meta::ClientMeta;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct SignOutcome {
    pub proposal: PublicProposal,
    pub signature: Signature,
}

/// Stored signature next to a fresh hash of the proposal's current sections.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureAudit {
    pub signature: Signature,
    pub current_content_hash: String,
    pub content_matches: bool,
}

fn already_signed() -> AppError {
    AppError::Core(CoreError::Conflict("Proposal is already signed".into()))
}

pub struct SignatureService<'a> {
    store: &'a dyn Store,
    events: &'a EventBus,
    locks: &'a ProposalLocks,
}

impl<'a> SignatureService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            store: state.store.as_ref(),
            events: state.event_bus.as_ref(),
            locks: state.locks.as_ref(),
        }
    }

    /// Sign the proposal behind `slug`.
    ///
    /// Checks run in order: unknown slug, already signed, invalid payload.
    /// The signature, the `signed` status and the `signed` event are
    /// committed together.
    pub async fn sign(
        &self,
        slug: &str,
        request: &SignRequest,
        client: &ClientMeta,
    ) -> AppResult<SignOutcome> {
        let found = proposal_by_slug(self.store, slug).await?;

        let _guard = self.locks.acquire(found.id).await;
        let mut proposal = self
            .store
            .find_proposal(found.id)
            .await?
            .ok_or_else(|| CoreError::not_found("Proposal", slug))?;
        if proposal.status == ProposalStatus::Signed {
            return Err(already_signed());
        }
        let capture = request.validate()?;

        let proposal_content_hash = content_hash(&proposal.sections)?;
        let now = Utc::now();

        let signature = NewSignature {
            proposal_id: proposal.id,
            signer_name: capture.signer_name.clone(),
            signer_email: capture
                .signer_email
                .or_else(|| proposal.recipient.email.clone()),
            signed_at: now,
            signer_ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
            signature_type: capture.signature_type,
            signature_data: capture.signature_data,
            proposal_content_hash,
        };
        let event = NewAnalyticsEvent {
            proposal_id: proposal.id,
            event_type: EVENT_SIGNED.to_string(),
            metadata: serde_json::json!({ META_SIGNER_NAME: capture.signer_name }),
            created_at: now,
        };
        proposal.status = ProposalStatus::Signed;
        proposal.signed_at = Some(now);
        proposal.updated_at = now;

        let signature = match self
            .store
            .record_signing(&signature, &proposal, &event)
            .await
        {
            Ok(signature) => signature,
            Err(StoreError::Duplicate(constraint))
                if constraint == constraints::SIGNATURE_PROPOSAL =>
            {
                return Err(already_signed());
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            proposal_id = proposal.id,
            signature_type = %signature.signature_type,
            "Proposal signed"
        );
        self.events.publish(
            IntegrationEvent::new(names::PROPOSAL_SIGNED, proposal.id, proposal.owner_id)
                .with_payload(serde_json::json!({ META_SIGNER_NAME: signature.signer_name })),
        );

        Ok(SignOutcome {
            proposal: PublicProposal::from(&proposal),
            signature,
        })
    }

    /// Compare the stored content hash with the proposal's current sections.
    ///
    /// Drift is reported and logged, never treated as an error.
    pub async fn audit(&self, owner_id: DbId, proposal_id: DbId) -> AppResult<SignatureAudit> {
        let proposal = owned_proposal(self.store, owner_id, proposal_id).await?;
        let signature = self
            .store
            .find_signature_for_proposal(proposal.id)
            .await?
            .ok_or_else(|| CoreError::not_found("Signature for proposal", proposal_id))?;

        let current_content_hash = content_hash(&proposal.sections)?;
        let content_matches = current_content_hash == signature.proposal_content_hash;
        if !content_matches {
            tracing::warn!(
                proposal_id,
                signed_hash = %signature.proposal_content_hash,
                current_hash = %current_content_hash,
                "Proposal content changed after signing"
            );
        }

        Ok(SignatureAudit {
            signature,
            current_content_hash,
            content_matches,
        })
    }
}
