//! Webhook delivery with exponential-backoff retry.
//!
//! [`WebhookDelivery`] POSTs a JSON-encoded [`IntegrationEvent`] to the
//! owner's webhook URL. A failed attempt is retried three times, waiting
//! 1 s, 2 s and 4 s in between.

use std::time::Duration;

use crate::bus::IntegrationEvent;

const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// Timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the owner's automation API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Network, DNS, timeout or client construction failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

pub struct WebhookDelivery {
    client: reqwest::Client,
    backoff: Vec<Duration>,
}

impl WebhookDelivery {
    pub fn new() -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            backoff: RETRY_DELAYS_SECS
                .iter()
                .map(|s| Duration::from_secs(*s))
                .collect(),
        })
    }

    /// Replace the waits between attempts. One retry per entry.
    pub fn with_backoff(mut self, backoff: Vec<Duration>) -> Self {
        self.backoff = backoff;
        self
    }

    /// Deliver `event` to `url`, retrying on failure.
    ///
    /// Returns the first error if every attempt fails.
    pub async fn deliver(
        &self,
        url: &str,
        api_key: Option<&str>,
        event: &IntegrationEvent,
    ) -> Result<(), WebhookError> {
        let mut first_err: Option<WebhookError> = None;

        for (attempt, delay) in self.backoff.iter().enumerate() {
            match self.try_send(url, api_key, event).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url,
                        error = %e,
                        "Webhook delivery attempt failed, retrying"
                    );
                    first_err.get_or_insert(e);
                    tokio::time::sleep(*delay).await;
                }
            }
        }

        match self.try_send(url, api_key, event).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(url, error = %e, "Webhook delivery failed after all retries");
                Err(first_err.unwrap_or(e))
            }
        }
    }

    async fn try_send(
        &self,
        url: &str,
        api_key: Option<&str>,
        event: &IntegrationEvent,
    ) -> Result<(), WebhookError> {
        let mut request = self.client.post(url).json(event);
        if let Some(key) = api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}
