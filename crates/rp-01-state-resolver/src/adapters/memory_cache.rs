//! In-memory TTL cache
//!
//! Implements [`CacheStore`] with passive expiry: an entry is live while
//! `now < expires_at` and reads as absent from its expiry instant on. Expired
//! entries are dropped when next touched or by [`InMemoryCacheStore::purge_expired`].

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::StoreError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::clock::{expiry_after, SystemClock};
use crate::domain::DataKey;
use crate::ports::{CacheStore, Clock, Timestamp};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Timestamp,
}

impl CacheEntry {
    fn is_live(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}

pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Time left before `key` expires, `None` if absent or expired.
    pub fn ttl_remaining(&self, key: &DataKey) -> Option<Duration> {
        let now = self.clock.now();
        self.entries
            .lock()
            .get(key.as_str())
            .filter(|entry| entry.is_live(now))
            .map(|entry| Duration::from_millis(entry.expires_at - now))
    }

    /// Drops every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &DataKey) -> Result<Option<String>, StoreError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        match entries.get(key.as_str()) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_with_expiry(
        &self,
        key: &DataKey,
        value: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let expires_at = expiry_after(self.clock.now(), ttl);
        self.entries.lock().insert(
            key.as_str().to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn touch(&self, key: &DataKey, ttl: Duration) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        match entries.get_mut(key.as_str()) {
            Some(entry) if entry.is_live(now) => entry.expires_at = expiry_after(now, ttl),
            Some(_) => {
                entries.remove(key.as_str());
            }
            None => {}
        }
        Ok(())
    }
}
