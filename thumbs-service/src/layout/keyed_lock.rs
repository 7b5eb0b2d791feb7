//! Per-key async mutual exclusion
//!
//! A process-local table of mutexes, one per key string. Calls for the same
//! key serialize; calls for different keys proceed fully in parallel. This is
//! not a distributed lock: cross-process races are resolved by the layout
//! engine's idempotence, so re-running a migration is safe, merely redundant.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct KeyedLock {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, suspending until any in-flight holder for
    /// the same key releases it. The guard is scoped to the caller.
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(key.to_string())
            .or_default()
            .value()
            .clone();
        mutex.lock_owned().await
    }
}
