//! Repository for the `proposals` table.
//!
//! JSONB columns (`sections`, `recipient`, `generation_source`) are bound
//! through [`sqlx::types::Json`]; `status` is stored as its snake_case name.

use arcdraft_core::proposal::ProposalStatus;
use arcdraft_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::proposal::{NewProposal, Proposal};

pub(crate) const COLUMNS: &str = "\
    id, owner_id, title, template_id, status, sections, recipient, \
    generation_source, public_slug, passcode, signed_at, viewed_at, \
    created_at, updated_at";

pub struct ProposalRepo;

impl ProposalRepo {
    /// Insert a new proposal in `draft` status.
    pub async fn create(pool: &PgPool, input: &NewProposal) -> Result<Proposal, sqlx::Error> {
        let query = format!(
            "INSERT INTO proposals \
                (owner_id, title, template_id, status, sections, recipient, \
                 generation_source, public_slug, passcode) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(input.owner_id)
            .bind(&input.title)
            .bind(&input.template_id)
            .bind(ProposalStatus::Draft.as_str())
            .bind(Json(&input.sections))
            .bind(Json(&input.recipient))
            .bind(Json(&input.generation_source))
            .bind(&input.public_slug)
            .bind(&input.passcode)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposals WHERE id = $1");
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposals WHERE public_slug = $1");
        sqlx::query_as::<_, Proposal>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List an owner's proposals in creation order, optionally by status.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        status: Option<ProposalStatus>,
    ) -> Result<Vec<Proposal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposals \
             WHERE owner_id = $1 AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY id"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(owner_id)
            .bind(status.map(ProposalStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Write back the mutable columns. `public_slug`, `owner_id` and the
    /// generation metadata are never touched.
    pub async fn save(pool: &PgPool, proposal: &Proposal) -> Result<Option<Proposal>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::save_on(&mut conn, proposal).await
    }

    pub(crate) async fn save_on(
        conn: &mut PgConnection,
        proposal: &Proposal,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET \
                title = $2, status = $3, sections = $4, recipient = $5, \
                passcode = $6, signed_at = $7, viewed_at = $8, updated_at = $9 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(proposal.id)
            .bind(&proposal.title)
            .bind(proposal.status.as_str())
            .bind(Json(&proposal.sections))
            .bind(Json(&proposal.recipient))
            .bind(&proposal.passcode)
            .bind(proposal.signed_at)
            .bind(proposal.viewed_at)
            .bind(proposal.updated_at)
            .fetch_optional(conn)
            .await
    }
}
