//! Per-user lock registry.
//!
//! Every mutating store operation holds its user's lock from the first read
//! to the batch write. Users never share a lock.

use std::collections::HashMap;
use std::sync::Arc;

use homehome_core::UserId;
use parking_lot::Mutex;

/// Registry size above which idle entries are dropped.
const PRUNE_THRESHOLD: usize = 4096;

/// Hands out one mutex per user.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for `user_id`. Callers hold `handle.lock()` for the whole
    /// read-modify-write.
    pub fn handle(&self, user_id: &UserId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        if locks.len() >= PRUNE_THRESHOLD {
            // Only the registry holds an idle entry.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        Arc::clone(locks.entry(*user_id).or_default())
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}
