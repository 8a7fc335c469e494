//! Entity models and DTOs.

pub mod account;
pub mod analytics_event;
pub mod proposal;
pub mod settings;
pub mod signature;
