//! Per-proposal mutual exclusion
//!
//! Every mutating operation on a proposal (ranking, vote, phase check, vote
//! period open/close) runs while holding that proposal's lock. Different
//! proposals never contend. An entry lives only while someone holds or
//! waits for it.

use agora_domain::ProposalId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<ProposalId, Arc<AsyncMutex<()>>>;

/// Registry of one async mutex per proposal
#[derive(Clone, Default)]
pub struct ProposalLocks {
    locks: Arc<Mutex<LockMap>>,
}

/// Exclusive access to one proposal; released on drop
pub struct ProposalGuard {
    id: ProposalId,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<Mutex<LockMap>>,
}

impl ProposalLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`
    pub async fn acquire(&self, id: ProposalId) -> ProposalGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(locks.entry(id).or_default())
        };
        ProposalGuard {
            id,
            guard: Some(lock.lock_owned().await),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of proposals currently locked or waited on
    pub fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for ProposalGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Waiters cloned the Arc under this same map lock
        if locks
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.id);
        }
    }
}
