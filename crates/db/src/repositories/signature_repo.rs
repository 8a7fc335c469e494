//! Repository for the `signatures` table.

use arcdraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::analytics_event::NewAnalyticsEvent;
use crate::models::proposal::Proposal;
use crate::models::signature::{NewSignature, Signature};
use crate::repositories::{AnalyticsEventRepo, ProposalRepo};

const COLUMNS: &str = "\
    id, proposal_id, signer_name, signer_email, signed_at, signer_ip, \
    user_agent, signature_type, signature_data, proposal_content_hash";

pub struct SignatureRepo;

impl SignatureRepo {
    /// Insert the signature, write back the signed proposal, and append the
    /// `signed` event in one transaction.
    ///
    /// A second signature for the same proposal violates
    /// `uq_signatures_proposal_id` and rolls everything back.
    pub async fn record_signing(
        pool: &PgPool,
        input: &NewSignature,
        proposal: &Proposal,
        event: &NewAnalyticsEvent,
    ) -> Result<Signature, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO signatures \
                (proposal_id, signer_name, signer_email, signed_at, signer_ip, \
                 user_agent, signature_type, signature_data, proposal_content_hash) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        let signature = sqlx::query_as::<_, Signature>(&insert_query)
            .bind(input.proposal_id)
            .bind(&input.signer_name)
            .bind(&input.signer_email)
            .bind(input.signed_at)
            .bind(&input.signer_ip)
            .bind(&input.user_agent)
            .bind(input.signature_type.as_str())
            .bind(&input.signature_data)
            .bind(&input.proposal_content_hash)
            .fetch_one(&mut *tx)
            .await?;

        if ProposalRepo::save_on(&mut tx, proposal).await?.is_none() {
            return Err(sqlx::Error::RowNotFound);
        }
        AnalyticsEventRepo::create_on(&mut tx, event).await?;

        tx.commit().await?;
        Ok(signature)
    }

    pub async fn find_by_proposal(
        pool: &PgPool,
        proposal_id: DbId,
    ) -> Result<Option<Signature>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM signatures WHERE proposal_id = $1");
        sqlx::query_as::<_, Signature>(&query)
            .bind(proposal_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_proposal(
        pool: &PgPool,
        proposal_id: DbId,
    ) -> Result<Vec<Signature>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM signatures WHERE proposal_id = $1 ORDER BY id");
        sqlx::query_as::<_, Signature>(&query)
            .bind(proposal_id)
            .fetch_all(pool)
            .await
    }
}
