use std::sync::Arc;

use arcdraft_db::Store;
use arcdraft_events::EventBus;

use crate::config::ServerConfig;
use crate::engine::locks::ProposalLocks;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Injected storage backend (in-memory or PostgreSQL).
    pub store: Arc<dyn Store>,
    pub config: Arc<ServerConfig>,
    /// Integration notifications are published here, never awaited.
    pub event_bus: Arc<EventBus>,
    /// Per-proposal mutual exclusion for read-check-write sequences.
    pub locks: Arc<ProposalLocks>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig, event_bus: Arc<EventBus>) -> Self {
        Self {
            store,
            config: Arc::new(config),
            event_bus,
            locks: Arc::new(ProposalLocks::new()),
        }
    }
}
