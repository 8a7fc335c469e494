//! Background routing of integration events to owner webhooks.
//!
//! [`IntegrationDispatcher`] subscribes to the [`EventBus`](crate::bus::EventBus),
//! resolves each event owner's [`AutomationSettings`] and hands the event to
//! [`WebhookDelivery`] in a task of its own, so a slow endpoint never holds
//! up the rest of the stream. Owners without a webhook URL are skipped.

use std::sync::Arc;

use arcdraft_db::models::settings::AutomationSettings;
use arcdraft_db::store::SettingsStore;
use arcdraft_db::Store;
use tokio::sync::broadcast;

use crate::bus::IntegrationEvent;
use crate::delivery::webhook::WebhookDelivery;

pub struct IntegrationDispatcher;

impl IntegrationDispatcher {
    /// Run the dispatch loop until the bus is dropped.
    pub async fn run(
        store: Arc<dyn Store>,
        delivery: Arc<WebhookDelivery>,
        mut receiver: broadcast::Receiver<IntegrationEvent>,
    ) {
        loop {
            match receiver.recv().await {
                Ok(event) => Self::dispatch(&store, &delivery, event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Integration dispatcher lagged, some notifications were dropped"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, integration dispatcher shutting down");
                    break;
                }
            }
        }
    }

    async fn dispatch(
        store: &Arc<dyn Store>,
        delivery: &Arc<WebhookDelivery>,
        event: IntegrationEvent,
    ) {
        let settings = match store.automation(event.owner_id).await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    owner_id = event.owner_id,
                    event = %event.event,
                    "Failed to load automation settings"
                );
                return;
            }
        };

        let Some((url, api_key)) = settings.as_ref().and_then(webhook_target) else {
            tracing::debug!(
                owner_id = event.owner_id,
                event = %event.event,
                "No webhook configured, skipping notification"
            );
            return;
        };

        let delivery = Arc::clone(delivery);
        tokio::spawn(async move {
            if delivery
                .deliver(&url, api_key.as_deref(), &event)
                .await
                .is_ok()
            {
                tracing::debug!(
                    proposal_id = event.proposal_id,
                    event = %event.event,
                    "Integration notification delivered"
                );
            }
        });
    }
}

/// The webhook URL and optional API key, when a non-blank URL is configured.
fn webhook_target(settings: &AutomationSettings) -> Option<(String, Option<String>)> {
    let url = settings
        .webhook_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())?;
    let api_key = settings
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .map(str::to_string);
    Some((url.to_string(), api_key))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use arcdraft_db::models::settings::UpdateAutomation;
    use arcdraft_db::MemoryStore;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use chrono::Utc;
    use tokio::sync::mpsc;

    use super::*;
    use crate::bus::{names, EventBus};

    #[test]
    fn blank_url_means_no_target() {
        let settings = AutomationSettings {
            owner_id: 1,
            webhook_url: Some("  ".into()),
            api_key: Some("k".into()),
            updated_at: Utc::now(),
        };
        assert!(webhook_target(&settings).is_none());
    }

    #[test]
    fn empty_api_key_is_omitted() {
        let settings = AutomationSettings {
            owner_id: 1,
            webhook_url: Some("http://hooks.local/x".into()),
            api_key: Some(String::new()),
            updated_at: Utc::now(),
        };
        assert_eq!(
            webhook_target(&settings),
            Some(("http://hooks.local/x".to_string(), None))
        );
    }

    #[tokio::test]
    async fn routes_events_to_the_owners_webhook_only() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let router = Router::new().route(
            "/hook",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let tx = tx.clone();
                async move {
                    let key = headers
                        .get("x-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    let _ = tx.send((key, body));
                    StatusCode::OK
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let store = Arc::new(MemoryStore::new());
        store
            .upsert_automation(
                1,
                &UpdateAutomation {
                    webhook_url: Some(format!("http://{addr}/hook")),
                    api_key: Some("owner-key".into()),
                },
            )
            .await
            .unwrap();

        let bus = EventBus::new(16);
        let delivery = Arc::new(WebhookDelivery::new().unwrap());
        let handle = tokio::spawn(IntegrationDispatcher::run(
            store,
            delivery,
            bus.subscribe(),
        ));

        // Owner 2 has no settings and must be skipped.
        bus.publish(IntegrationEvent::new(names::PROPOSAL_SENT, 10, 2));
        bus.publish(IntegrationEvent::new(names::PROPOSAL_GENERATED, 11, 1));

        let (key, body) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(key.as_deref(), Some("owner-key"));
        assert_eq!(body["event"], "proposal.generated");
        assert_eq!(body["proposalId"], 11);

        drop(bus);
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(rx.try_recv().is_err());
    }
}
