//! In-memory TTL lock
//!
//! Mirrors the set-if-absent-with-expiry lock pattern of a remote key-value
//! store: acquisition succeeds only when the key is free or its previous
//! holder's TTL has run out, and release is compare-and-delete on the owner
//! token.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::clock::{expiry_after, SystemClock};
use crate::domain::LockKey;
use crate::error::LockError;
use crate::ports::{Clock, DistributedLock, Timestamp};

#[derive(Debug, Clone)]
struct LockEntry {
    owner: String,
    expires_at: Timestamp,
}

pub struct InMemoryLockManager {
    locks: Mutex<HashMap<String, LockEntry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Whether any owner currently holds `key`.
    pub fn is_locked(&self, key: &LockKey) -> bool {
        let now = self.clock.now();
        self.locks
            .lock()
            .get(key.as_str())
            .is_some_and(|entry| now < entry.expires_at)
    }

    /// Number of live locks.
    pub fn held_count(&self) -> usize {
        let now = self.clock.now();
        self.locks
            .lock()
            .values()
            .filter(|entry| now < entry.expires_at)
            .count()
    }
}

impl Default for InMemoryLockManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DistributedLock for InMemoryLockManager {
    async fn try_acquire(
        &self,
        key: &LockKey,
        owner: &str,
        ttl: Duration,
    ) -> Result<bool, LockError> {
        let now = self.clock.now();
        let mut locks = self.locks.lock();

        if let Some(entry) = locks.get(key.as_str()) {
            if now < entry.expires_at {
                return Ok(false);
            }
        }

        locks.insert(
            key.as_str().to_string(),
            LockEntry {
                owner: owner.to_string(),
                expires_at: expiry_after(now, ttl),
            },
        );
        Ok(true)
    }

    async fn release(&self, key: &LockKey, owner: &str) -> Result<bool, LockError> {
        let now = self.clock.now();
        let mut locks = self.locks.lock();

        match locks.get(key.as_str()) {
            Some(entry) if entry.owner == owner && now < entry.expires_at => {
                locks.remove(key.as_str());
                Ok(true)
            }
            Some(entry) if now >= entry.expires_at => {
                locks.remove(key.as_str());
                Ok(false)
            }
            _ => Ok(false),
        }
    }
}
