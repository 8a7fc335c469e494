pub mod analytics;
pub mod auth;
pub mod profile;
pub mod proposals;
pub mod public;
pub mod settings;
