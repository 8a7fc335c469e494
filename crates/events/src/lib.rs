//! ArcDraft integration notifications.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`. Request handlers only publish; they never wait
//!   on delivery.
//! - [`IntegrationEvent`]: the notification envelope (`proposal.generated`,
//!   `proposal.sent`, `proposal.signed`).
//! - [`WebhookDelivery`]: HTTP POST with exponential-backoff retry.
//! - [`IntegrationDispatcher`]: background task routing each event to its
//!   owner's configured webhook.

pub mod bus;
pub mod delivery;
pub mod dispatcher;

pub use bus::{EventBus, IntegrationEvent};
pub use delivery::webhook::{WebhookDelivery, WebhookError};
pub use dispatcher::IntegrationDispatcher;
