//! Per-proposal mutual exclusion.
//!
//! Update, the view-triggered status change and signing each read a
//! proposal, check its status and write it back. Holding the proposal's lock
//! across that sequence serializes them per proposal while leaving unrelated
//! proposals concurrent.

use std::collections::HashMap;
use std::sync::Arc;

use arcdraft_core::types::DbId;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct ProposalLocks {
    entries: Mutex<HashMap<DbId, Arc<Mutex<()>>>>,
}

impl ProposalLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `proposal_id`. Released on drop.
    pub async fn acquire(&self, proposal_id: DbId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut entries = self.entries.lock().await;
            // Entries referenced only by the map are idle.
            entries.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(entries.entry(proposal_id).or_default())
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.entries.lock().await.len()
    }
}
