//! Repository for the append-only `analytics_events` table.

use arcdraft_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::analytics_event::{AnalyticsEvent, NewAnalyticsEvent};

const COLUMNS: &str = "id, proposal_id, event_type, metadata, created_at";

pub struct AnalyticsEventRepo;

impl AnalyticsEventRepo {
    pub async fn create(
        pool: &PgPool,
        input: &NewAnalyticsEvent,
    ) -> Result<AnalyticsEvent, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::create_on(&mut conn, input).await
    }

    pub(crate) async fn create_on(
        conn: &mut PgConnection,
        input: &NewAnalyticsEvent,
    ) -> Result<AnalyticsEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO analytics_events (proposal_id, event_type, metadata, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AnalyticsEvent>(&query)
            .bind(input.proposal_id)
            .bind(&input.event_type)
            .bind(&input.metadata)
            .bind(input.created_at)
            .fetch_one(conn)
            .await
    }

    /// All events of a proposal in insertion order.
    pub async fn list_by_proposal(
        pool: &PgPool,
        proposal_id: DbId,
    ) -> Result<Vec<AnalyticsEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM analytics_events WHERE proposal_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, AnalyticsEvent>(&query)
            .bind(proposal_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_owner_since(
        pool: &PgPool,
        owner_id: DbId,
        event_type: &str,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM analytics_events e \
             JOIN proposals p ON p.id = e.proposal_id \
             WHERE p.owner_id = $1 AND e.event_type = $2 AND e.created_at >= $3",
        )
        .bind(owner_id)
        .bind(event_type)
        .bind(since)
        .fetch_one(pool)
        .await
    }
}
