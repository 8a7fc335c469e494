//! In-process event bus backed by a `tokio::sync::broadcast` channel.

use arcdraft_core::types::{DbId, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Notification event names.
pub mod names {
    pub const PROPOSAL_GENERATED: &str = "proposal.generated";
    pub const PROPOSAL_SENT: &str = "proposal.sent";
    pub const PROPOSAL_SIGNED: &str = "proposal.signed";
}

// ---------------------------------------------------------------------------
// IntegrationEvent
// ---------------------------------------------------------------------------

/// A proposal lifecycle notification for the owner's automation webhook.
///
/// Serializes to the webhook body:
/// `{event, proposalId, ownerId, payload, timestamp}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationEvent {
    /// Dot-separated event name, see [`names`].
    pub event: String,
    pub proposal_id: DbId,
    pub owner_id: DbId,
    /// Event-specific fields, e.g. `signerName` for `proposal.signed`.
    pub payload: serde_json::Value,
    pub timestamp: Timestamp,
}

impl IntegrationEvent {
    pub fn new(event: impl Into<String>, proposal_id: DbId, owner_id: DbId) -> Self {
        Self {
            event: event.into(),
            proposal_id,
            owner_id,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out bus shared as `Arc<EventBus>`.
///
/// The channel is bounded: when it is full the oldest unconsumed events are
/// dropped and slow receivers observe `RecvError::Lagged`.
pub struct EventBus {
    sender: broadcast::Sender<IntegrationEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish to all current subscribers. Never blocks or fails.
    pub fn publish(&self, event: IntegrationEvent) {
        // A send error only means nobody is subscribed.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IntegrationEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_each_receive_published_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(
            IntegrationEvent::new(names::PROPOSAL_SIGNED, 5, 1)
                .with_payload(serde_json::json!({ "signerName": "Alex" })),
        );

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1.event, "proposal.signed");
        assert_eq!(e1.proposal_id, 5);
        assert_eq!(e2.payload["signerName"], "Alex");
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        EventBus::new(4).publish(IntegrationEvent::new(names::PROPOSAL_SENT, 1, 1));
    }

    #[test]
    fn serializes_to_webhook_shape() {
        let value = serde_json::to_value(IntegrationEvent::new(names::PROPOSAL_SENT, 9, 2)).unwrap();
        assert_eq!(value["event"], "proposal.sent");
        assert_eq!(value["proposalId"], 9);
        assert_eq!(value["ownerId"], 2);
        assert!(value["payload"].is_object());
        assert!(value["timestamp"].is_string());
    }

    #[tokio::test]
    async fn slow_receiver_lags_instead_of_blocking_publisher() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for id in 0..5 {
            bus.publish(IntegrationEvent::new(names::PROPOSAL_GENERATED, id, 1));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        assert_eq!(rx.recv().await.unwrap().proposal_id, 3);
    }
}
