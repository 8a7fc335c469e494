//! ArcDraft domain core.
//!
//! Pure, I/O-free building blocks shared by the storage, event and HTTP
//! layers: the proposal status machine, section model, mock generator,
//! analytics aggregation helpers, signature content hashing, and public-link
//! helpers.

pub mod analytics;
pub mod error;
pub mod generation;
pub mod hashing;
pub mod proposal;
pub mod public_link;
pub mod signature;
pub mod types;
