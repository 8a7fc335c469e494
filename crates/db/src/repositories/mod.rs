//! Repository layer: one zero-sized struct per table group, each taking a
//! `&PgPool` and returning raw `sqlx::Error`s.

pub mod account_repo;
pub mod analytics_event_repo;
pub mod proposal_repo;
pub mod settings_repo;
pub mod signature_repo;

pub use account_repo::AccountRepo;
pub use analytics_event_repo::AnalyticsEventRepo;
pub use proposal_repo::ProposalRepo;
pub use settings_repo::SettingsRepo;
pub use signature_repo::SignatureRepo;
