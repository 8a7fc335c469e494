//! Engagement event vocabulary and aggregation helpers.
//!
//! Analytics are never pre-aggregated: every read folds the full event log of
//! a proposal through the helpers here.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

pub const EVENT_VIEW: &str = "view";
pub const EVENT_SCROLL_DEPTH: &str = "scroll_depth";
pub const EVENT_SECTION_VIEW: &str = "section_view";
/// Emitted by the signing flow only; clients may not record it.
pub const EVENT_SIGNED: &str = "signed";

/// Metadata key holding the section a `section_view` refers to.
pub const META_SECTION_ID: &str = "sectionId";
/// Metadata key holding the time spent on a section, in milliseconds.
pub const META_DURATION_MS: &str = "durationMs";
/// Metadata key on `signed` events.
pub const META_SIGNER_NAME: &str = "signerName";

/// Trailing window used for the "views in the last 30 days" metric.
pub const VIEW_WINDOW_DAYS: i64 = 30;

/// Validate an event type submitted by a public client.
///
/// Any non-blank type is accepted except the server-owned `signed`.
pub fn validate_client_event_type(event_type: &str) -> Result<(), CoreError> {
    if event_type.trim().is_empty() {
        return Err(CoreError::Validation("eventType is required".into()));
    }
    if event_type == EVENT_SIGNED {
        return Err(CoreError::Validation(
            "eventType 'signed' is recorded by the signing flow only".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Overview metrics
// ---------------------------------------------------------------------------

/// Signed / total as a whole-number percentage; 0 when there are no proposals.
pub fn conversion_rate(signed: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    ((signed as f64 / total as f64) * 100.0).round() as i64
}

/// Inclusive lower bound of the view window ending at `now`.
pub fn view_window_start(now: Timestamp) -> Timestamp {
    now - chrono::Duration::days(VIEW_WINDOW_DAYS)
}

/// Account-wide proposal metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub proposals_total: usize,
    pub proposals_signed: usize,
    pub conversion_rate: i64,
    pub views_last_30_days: usize,
}

impl Overview {
    pub fn new(proposals_total: usize, proposals_signed: usize, views_last_30_days: usize) -> Self {
        Self {
            proposals_total,
            proposals_signed,
            conversion_rate: conversion_rate(proposals_signed, proposals_total),
            views_last_30_days,
        }
    }
}

// ---------------------------------------------------------------------------
// Section dwell time
// ---------------------------------------------------------------------------

/// Per-section engagement derived from `section_view` events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionViewStats {
    pub section_id: String,
    pub view_count: usize,
    /// Arithmetic mean of `durationMs`, unrounded.
    pub avg_time_on_section: f64,
}

/// Accumulates `section_view` metadata, keeping first-seen section order.
#[derive(Debug, Default)]
pub struct SectionDwell {
    sections: IndexMap<String, (usize, f64)>,
}

impl SectionDwell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one `section_view` event's metadata in.
    ///
    /// Events without a non-empty string `sectionId` are ignored; a missing
    /// or non-numeric `durationMs` counts as 0.
    pub fn record(&mut self, metadata: &serde_json::Value) {
        let Some(section_id) = metadata
            .get(META_SECTION_ID)
            .and_then(|v| v.as_str())
            .filter(|id| !id.is_empty())
        else {
            return;
        };
        let duration = metadata
            .get(META_DURATION_MS)
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);

        let entry = self
            .sections
            .entry(section_id.to_string())
            .or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += duration;
    }

    pub fn finish(self) -> Vec<SectionViewStats> {
        self.sections
            .into_iter()
            .map(|(section_id, (count, total))| SectionViewStats {
                section_id,
                view_count: count,
                avg_time_on_section: total / count as f64,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    #[test]
    fn conversion_rate_handles_zero_total() {
        assert_eq!(conversion_rate(0, 0), 0);
    }

    #[test]
    fn conversion_rate_rounds_to_whole_percent() {
        assert_eq!(conversion_rate(1, 3), 33);
        assert_eq!(conversion_rate(2, 3), 67);
        assert_eq!(conversion_rate(1, 2), 50);
        assert_eq!(conversion_rate(4, 4), 100);
    }

    #[test]
    fn view_window_is_thirty_days_back() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap();
        let start = view_window_start(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn averages_duration_per_section() {
        let mut dwell = SectionDwell::new();
        dwell.record(&json!({ "sectionId": "s1", "durationMs": 1000 }));
        dwell.record(&json!({ "sectionId": "s1", "durationMs": 3000 }));
        let stats = dwell.finish();
        assert_eq!(
            stats,
            vec![SectionViewStats {
                section_id: "s1".into(),
                view_count: 2,
                avg_time_on_section: 2000.0,
            }]
        );
    }

    #[test]
    fn missing_duration_counts_as_zero_and_average_is_unrounded() {
        let mut dwell = SectionDwell::new();
        dwell.record(&json!({ "sectionId": "a", "durationMs": 1000 }));
        dwell.record(&json!({ "sectionId": "a" }));
        dwell.record(&json!({ "sectionId": "a", "durationMs": 1 }));
        let stats = dwell.finish();
        assert_eq!(stats[0].view_count, 3);
        assert!((stats[0].avg_time_on_section - 1001.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn events_without_section_id_are_excluded_and_order_is_first_seen() {
        let mut dwell = SectionDwell::new();
        dwell.record(&json!({ "sectionId": "b", "durationMs": 10 }));
        dwell.record(&json!({ "durationMs": 500 }));
        dwell.record(&json!({ "sectionId": "", "durationMs": 500 }));
        dwell.record(&json!({ "sectionId": "a", "durationMs": 20 }));
        dwell.record(&json!({ "sectionId": "b", "durationMs": 30 }));
        let ids: Vec<_> = dwell.finish().into_iter().map(|s| s.section_id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn client_cannot_record_signed_or_blank_events() {
        assert!(validate_client_event_type("view").is_ok());
        assert!(validate_client_event_type("cta_click").is_ok());
        assert!(validate_client_event_type("signed").is_err());
        assert!(validate_client_event_type(" ").is_err());
    }

    #[test]
    fn overview_computes_rate() {
        let overview = Overview::new(0, 0, 0);
        assert_eq!(overview.conversion_rate, 0);
        let overview = Overview::new(4, 1, 7);
        assert_eq!(overview.conversion_rate, 25);
        assert_eq!(overview.views_last_30_days, 7);
    }
}
