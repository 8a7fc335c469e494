//! Analytics event model and DTO.

use arcdraft_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `analytics_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: DbId,
    pub proposal_id: DbId,
    pub event_type: String,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for appending an event. The timestamp is assigned by the server.
#[derive(Debug, Clone)]
pub struct NewAnalyticsEvent {
    pub proposal_id: DbId,
    pub event_type: String,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}
