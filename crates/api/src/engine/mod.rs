//! Proposal lifecycle services.
//!
//! - [`proposals::ProposalEngine`] -- generation, owner CRUD, public read and
//!   passcode gate.
//! - [`analytics::AnalyticsPipeline`] -- event recording and aggregation.
//! - [`signing::SignatureService`] -- signature capture and audit.
//! - [`locks::ProposalLocks`] -- per-proposal mutual exclusion.
//!
//! Every private operation loads its proposal through [`owned_proposal`].

pub mod analytics;
pub mod locks;
pub mod proposals;
pub mod signing;

use arcdraft_core::error::CoreError;
use arcdraft_core::types::DbId;
use arcdraft_db::models::proposal::Proposal;
use arcdraft_db::store::ProposalStore;
use arcdraft_db::Store;

use crate::error::AppResult;

pub use analytics::AnalyticsPipeline;
pub use proposals::ProposalEngine;
pub use signing::SignatureService;

/// Load a proposal that belongs to `owner_id`.
///
/// A proposal owned by someone else is reported exactly like a missing one.
pub async fn owned_proposal(
    store: &dyn Store,
    owner_id: DbId,
    proposal_id: DbId,
) -> AppResult<Proposal> {
    store
        .find_proposal(proposal_id)
        .await?
        .filter(|p| p.owner_id == owner_id)
        .ok_or_else(|| CoreError::not_found("Proposal", proposal_id).into())
}

/// Load a proposal by public slug.
pub async fn proposal_by_slug(store: &dyn Store, slug: &str) -> AppResult<Proposal> {
    store
        .find_proposal_by_slug(slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Proposal", slug).into())
}
