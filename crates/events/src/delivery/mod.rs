//! Outbound delivery channels for integration notifications.

pub mod webhook;
