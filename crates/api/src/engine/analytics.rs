//! Engagement event recording and on-demand aggregation.
//!
//! Nothing is pre-aggregated. Each read folds the full event log of one
//! proposal, or counts view events across an owner's proposals.

use arcdraft_core::analytics::{
    validate_client_event_type, view_window_start, Overview, SectionDwell, SectionViewStats,
    EVENT_SECTION_VIEW, EVENT_SIGNED, EVENT_VIEW,
};
use arcdraft_core::error::CoreError;
use arcdraft_core::proposal::ProposalStatus;
use arcdraft_core::types::{DbId, Timestamp};
use arcdraft_db::models::analytics_event::{AnalyticsEvent, NewAnalyticsEvent};
use arcdraft_db::store::{EventStore, ProposalStore};
use arcdraft_db::Store;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::engine::locks::ProposalLocks;
use crate::engine::{owned_proposal, proposal_by_slug};
use crate::error::AppResult;
use crate::state::AppState;

/// Body of a public event submission.
///
/// Clients may nest details under `metadata` or send them flat next to
/// `eventType`; flat fields are used only when `metadata` is absent or null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEventRequest {
    pub event_type: Option<String>,
    pub metadata: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Per-proposal engagement summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalAnalytics {
    pub total_views: usize,
    pub last_viewed_at: Option<Timestamp>,
    pub signed_at: Option<Timestamp>,
    pub section_view_stats: Vec<SectionViewStats>,
    pub events_timeline: Vec<AnalyticsEvent>,
}

/// Fold a proposal's event log, given in insertion order.
pub fn summarize(events: Vec<AnalyticsEvent>) -> ProposalAnalytics {
    let mut total_views = 0;
    let mut last_viewed_at: Option<Timestamp> = None;
    let mut signed_at = None;
    let mut dwell = SectionDwell::new();

    for event in &events {
        match event.event_type.as_str() {
            EVENT_VIEW => {
                total_views += 1;
                last_viewed_at = Some(match last_viewed_at {
                    Some(latest) => latest.max(event.created_at),
                    None => event.created_at,
                });
            }
            EVENT_SIGNED => {
                signed_at.get_or_insert(event.created_at);
            }
            EVENT_SECTION_VIEW => dwell.record(&event.metadata),
            _ => {}
        }
    }

    ProposalAnalytics {
        total_views,
        last_viewed_at,
        signed_at,
        section_view_stats: dwell.finish(),
        events_timeline: events,
    }
}

pub struct AnalyticsPipeline<'a> {
    store: &'a dyn Store,
    locks: &'a ProposalLocks,
}

impl<'a> AnalyticsPipeline<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            store: state.store.as_ref(),
            locks: state.locks.as_ref(),
        }
    }

    /// Append a client-reported event.
    ///
    /// An unknown slug is reported before an invalid event type. A `view`
    /// also stamps `viewed_at` and moves a `sent` proposal to `viewed`, under
    /// the proposal's lock. Views are not deduplicated.
    pub async fn record_event(
        &self,
        slug: &str,
        request: RecordEventRequest,
    ) -> AppResult<AnalyticsEvent> {
        let proposal = proposal_by_slug(self.store, slug).await?;

        let event_type = request.event_type.unwrap_or_default();
        validate_client_event_type(&event_type)?;
        let metadata = match request.metadata {
            None | Some(serde_json::Value::Null) => serde_json::Value::Object(request.extra),
            Some(value) => value,
        };

        if event_type != EVENT_VIEW {
            let event = self
                .store
                .append_event(&NewAnalyticsEvent {
                    proposal_id: proposal.id,
                    event_type,
                    metadata,
                    created_at: Utc::now(),
                })
                .await?;
            return Ok(event);
        }

        let _guard = self.locks.acquire(proposal.id).await;
        // Re-read under the lock; the unlocked copy may be stale.
        let mut proposal = self
            .store
            .find_proposal(proposal.id)
            .await?
            .ok_or_else(|| CoreError::not_found("Proposal", slug))?;

        let now = Utc::now();
        let event = self
            .store
            .append_event(&NewAnalyticsEvent {
                proposal_id: proposal.id,
                event_type,
                metadata,
                created_at: now,
            })
            .await?;

        let previous = proposal.status;
        proposal.viewed_at = Some(now);
        proposal.status = previous.after_view();
        proposal.updated_at = now;
        self.store.save_proposal(&proposal).await?;

        if previous != proposal.status {
            tracing::info!(proposal_id = proposal.id, "Proposal viewed for the first time");
        }
        Ok(event)
    }

    /// Engagement summary for one of the owner's proposals.
    pub async fn proposal_analytics(
        &self,
        owner_id: DbId,
        proposal_id: DbId,
    ) -> AppResult<ProposalAnalytics> {
        let proposal = owned_proposal(self.store, owner_id, proposal_id).await?;
        let events = self.store.list_events_for_proposal(proposal.id).await?;
        Ok(summarize(events))
    }

    /// Account-wide totals, conversion rate and 30-day view count.
    pub async fn overview(&self, owner_id: DbId) -> AppResult<Overview> {
        let proposals = self.store.list_proposals_for_owner(owner_id, None).await?;
        let signed = proposals
            .iter()
            .filter(|p| p.status == ProposalStatus::Signed)
            .count();
        let views = self
            .store
            .count_owner_events_since(owner_id, EVENT_VIEW, view_window_start(Utc::now()))
            .await?;
        Ok(Overview::new(proposals.len(), signed, views))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    use super::*;

    fn event(id: DbId, event_type: &str, metadata: serde_json::Value, secs: i64) -> AnalyticsEvent {
        AnalyticsEvent {
            id,
            proposal_id: 1,
            event_type: event_type.into(),
            metadata,
            created_at: Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap() + Duration::seconds(secs),
        }
    }

    #[test]
    fn empty_log_yields_zeros_and_nulls() {
        let summary = summarize(Vec::new());
        assert_eq!(summary.total_views, 0);
        assert!(summary.last_viewed_at.is_none());
        assert!(summary.signed_at.is_none());
        assert!(summary.section_view_stats.is_empty());
        assert!(summary.events_timeline.is_empty());
    }

    #[test]
    fn folds_views_signature_and_sections() {
        let events = vec![
            event(1, "view", json!({}), 0),
            event(2, "section_view", json!({ "sectionId": "s1", "durationMs": 1000 }), 5),
            event(3, "scroll_depth", json!({ "depth": 80 }), 6),
            event(4, "view", json!({}), 60),
            event(5, "section_view", json!({ "sectionId": "s1", "durationMs": 3000 }), 61),
            event(6, "signed", json!({ "signerName": "Alex" }), 120),
        ];
        let summary = summarize(events);

        assert_eq!(summary.total_views, 2);
        assert_eq!(
            summary.last_viewed_at,
            Some(Utc.with_ymd_and_hms(2026, 5, 1, 9, 1, 0).unwrap())
        );
        assert_eq!(
            summary.signed_at,
            Some(Utc.with_ymd_and_hms(2026, 5, 1, 9, 2, 0).unwrap())
        );
        assert_eq!(summary.section_view_stats.len(), 1);
        assert_eq!(summary.section_view_stats[0].view_count, 2);
        assert_eq!(summary.section_view_stats[0].avg_time_on_section, 2000.0);
        assert_eq!(
            summary.events_timeline.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(summarize(Vec::new())).unwrap();
        for key in [
            "totalViews",
            "lastViewedAt",
            "signedAt",
            "sectionViewStats",
            "eventsTimeline",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
