//! Advisory Locks
//!
//! Calls in one batch run concurrently. Two calls that touch the same path
//! (or the same environment variable) are serialized through a per-key async
//! mutex so that neither observes the other half-done. Which one runs first is
//! still unspecified: the last writer wins.
//!
//! Keys are acquired in sorted order so that two-path operations (copy, move)
//! cannot deadlock against each other.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Number of idle entries tolerated before the table is pruned.
const PRUNE_THRESHOLD: usize = 256;

/// What a lock protects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LockKey {
    /// A confined, normalized filesystem path.
    Path(PathBuf),
    /// A process environment variable name.
    Env(String),
}

/// Table of advisory locks, shared by every call dispatched through one context.
#[derive(Debug, Default)]
pub struct LockRegistry {
    entries: Mutex<HashMap<LockKey, Arc<AsyncMutex<()>>>>,
}

/// Guards held for the duration of one call. Dropping releases them.
#[derive(Debug)]
pub struct LockSet {
    guards: Vec<OwnedMutexGuard<()>>,
}

impl LockSet {
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire every key in `keys`, sorted and deduplicated.
    pub async fn acquire(&self, mut keys: Vec<LockKey>) -> LockSet {
        keys.sort();
        keys.dedup();

        let mutexes: Vec<Arc<AsyncMutex<()>>> = {
            let mut entries = match self.entries.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if entries.len() > PRUNE_THRESHOLD {
                entries.retain(|_, mutex| Arc::strong_count(mutex) > 1);
            }
            keys.into_iter()
                .map(|key| entries.entry(key).or_default().clone())
                .collect()
        };

        let mut guards = Vec::with_capacity(mutexes.len());
        for mutex in mutexes {
            guards.push(mutex.lock_owned().await);
        }
        LockSet { guards }
    }

    /// Number of keys currently tracked.
    pub fn tracked(&self) -> usize {
        match self.entries.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
