//! Latest account nonce resolution
//!
//! Identity fields always come from finalized history. The nonce is taken,
//! in order, from the cache, the account's latest pending transaction, or the
//! finalized row.

use shared_types::{AccountIndex, AccountRecord, Nonce};
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::deadline::store_call;
use super::lock_scope::LockHandle;
use super::ResolverBackends;
use crate::config::ResolverConfig;
use crate::domain::DataKey;
use crate::error::ResolverError;
use crate::metrics::{EntryClass, MetricsRecorder};

pub struct AccountStateResolver {
    backends: ResolverBackends,
    config: ResolverConfig,
    metrics: Arc<dyn MetricsRecorder>,
}

impl AccountStateResolver {
    pub fn new(
        backends: ResolverBackends,
        config: ResolverConfig,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            backends,
            config,
            metrics,
        }
    }

    /// Account record carrying the freshest known nonce.
    #[instrument(skip(self))]
    pub async fn resolve(&self, account_index: AccountIndex) -> Result<AccountRecord, ResolverError> {
        let result = self.resolve_inner(account_index).await;
        if let Err(err) = &result {
            self.metrics.record_failure(err.kind());
            error!(error = %err, "Failed to resolve latest account");
        }
        result
    }

    async fn resolve_inner(&self, account_index: AccountIndex) -> Result<AccountRecord, ResolverError> {
        let mut account = self.finalized_account(account_index).await?;
        let key = DataKey::account_nonce(account_index);

        if let Some(nonce) = self.cached_nonce(&key).await? {
            self.metrics.record_cache_hit(EntryClass::Nonce);
            if self.config.touch_nonce_on_hit {
                store_call(
                    self.config.call_timeout,
                    self.backends.cache.touch(&key, self.config.balance_expiry),
                )
                .await
                .map_err(ResolverError::cache)?;
            }
            debug!(nonce, "Nonce served from cache");
            account.nonce = nonce;
            return Ok(account);
        }
        self.metrics.record_cache_miss(EntryClass::Nonce);

        let mut lock = LockHandle::acquire(
            Arc::clone(&self.backends.lock),
            key.lock_key(),
            self.config.lock_expiry,
            self.config.call_timeout,
        )
        .await;
        self.metrics.record_lock_outcome(lock.outcome());

        let recomputed = self
            .recompute(account_index, account.nonce, &key, lock.is_held())
            .await;
        lock.release().await;

        account.nonce = recomputed?;
        Ok(account)
    }

    async fn finalized_account(&self, account_index: AccountIndex) -> Result<AccountRecord, ResolverError> {
        store_call(
            self.config.call_timeout,
            self.backends.history.get_account_by_index(account_index),
        )
        .await
        .map_err(ResolverError::history)?
        .ok_or(ResolverError::InvalidAccount { account_index })
    }

    async fn cached_nonce(&self, key: &DataKey) -> Result<Option<Nonce>, ResolverError> {
        let cached = store_call(self.config.call_timeout, self.backends.cache.get(key))
            .await
            .map_err(ResolverError::cache)?;

        cached
            .map(|value| {
                value
                    .parse::<Nonce>()
                    .map_err(|_| ResolverError::CorruptCacheEntry {
                        key: key.to_string(),
                        value,
                    })
            })
            .transpose()
    }

    /// Pending nonce if one exists, else the finalized one. Written back to
    /// the cache only when this resolution holds the lock.
    async fn recompute(
        &self,
        account_index: AccountIndex,
        finalized_nonce: Nonce,
        key: &DataKey,
        lock_held: bool,
    ) -> Result<Nonce, ResolverError> {
        let pending = store_call(
            self.config.call_timeout,
            self.backends.mempool.latest_pending_tx(account_index),
        )
        .await
        .map_err(ResolverError::mempool)?;

        let nonce = match pending {
            Some(tx) => {
                debug!(nonce = tx.nonce, "Nonce taken from pending transaction");
                tx.nonce
            }
            None => {
                debug!(nonce = finalized_nonce, "No pending transaction, using finalized nonce");
                finalized_nonce
            }
        };

        if lock_held {
            store_call(
                self.config.call_timeout,
                self.backends.cache.set_with_expiry(
                    key,
                    &nonce.to_string(),
                    self.config.balance_expiry,
                ),
            )
            .await
            .map_err(ResolverError::cache)?;
            self.metrics.record_repopulation(EntryClass::Nonce);
            debug!(cache_key = %key, nonce, "Nonce cache entry repopulated");
        }

        Ok(nonce)
    }
}
