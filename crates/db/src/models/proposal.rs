//! Proposal entity model, its public projection, and DTOs.

use arcdraft_core::proposal::{GenerationSource, ProposalStatus, Recipient, Section};
use arcdraft_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `proposals` table, as seen by its owner.
///
/// Invariants: `public_slug` never changes after insert, and `signed_at` is
/// set exactly when `status` is [`ProposalStatus::Signed`].
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub template_id: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ProposalStatus,
    #[sqlx(json)]
    pub sections: Vec<Section>,
    #[sqlx(json)]
    pub recipient: Recipient,
    #[sqlx(json)]
    pub generation_source: GenerationSource,
    pub public_slug: String,
    pub passcode: Option<String>,
    pub signed_at: Option<Timestamp>,
    pub viewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What a recipient may see: everything except `owner_id` and `passcode`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProposal {
    pub id: DbId,
    pub title: String,
    pub template_id: Option<String>,
    pub status: ProposalStatus,
    pub sections: Vec<Section>,
    pub recipient: Recipient,
    pub generation_source: GenerationSource,
    pub public_slug: String,
    pub signed_at: Option<Timestamp>,
    pub viewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Proposal> for PublicProposal {
    fn from(p: &Proposal) -> Self {
        Self {
            id: p.id,
            title: p.title.clone(),
            template_id: p.template_id.clone(),
            status: p.status,
            sections: p.sections.clone(),
            recipient: p.recipient.clone(),
            generation_source: p.generation_source.clone(),
            public_slug: p.public_slug.clone(),
            signed_at: p.signed_at,
            viewed_at: p.viewed_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// DTO for inserting a freshly generated proposal (always `draft`).
#[derive(Debug, Clone)]
pub struct NewProposal {
    pub owner_id: DbId,
    pub title: String,
    pub template_id: Option<String>,
    pub sections: Vec<Section>,
    pub recipient: Recipient,
    pub generation_source: GenerationSource,
    pub public_slug: String,
    pub passcode: Option<String>,
}
