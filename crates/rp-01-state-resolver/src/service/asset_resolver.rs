//! Latest asset balance resolution
//!
//! Order of precedence, freshest first:
//!
//! 1. A live cache entry, served as-is.
//! 2. The latest pending general-asset delta: its own base snapshot plus its
//!    delta. Only that single record is applied.
//! 3. The first finalized source in [`FINALIZED_BALANCE_CHAIN`] with a row,
//!    validated and canonicalized.
//! 4. `"0"`.
//!
//! Finalized sources are read before the mempool, so a history failure is
//! fatal even when a pending delta would have answered.

use shared_types::{
    AccountAssetBalance, AccountIndex, AssetId, AssetKind, StoreError, ZERO_BALANCE,
};
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::deadline::store_call;
use super::lock_scope::LockHandle;
use super::ResolverBackends;
use crate::config::ResolverConfig;
use crate::domain::{BalanceSource, DataKey, NumericDelta, FINALIZED_BALANCE_CHAIN};
use crate::error::ResolverError;
use crate::metrics::{EntryClass, MetricsRecorder};

pub struct AssetStateResolver {
    backends: ResolverBackends,
    config: ResolverConfig,
    numeric: NumericDelta,
    metrics: Arc<dyn MetricsRecorder>,
}

impl AssetStateResolver {
    pub fn new(
        backends: ResolverBackends,
        config: ResolverConfig,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            numeric: config.numeric_delta(),
            backends,
            config,
            metrics,
        }
    }

    /// Freshest known balance of `asset_id` held by `account_index`.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
    ) -> Result<AccountAssetBalance, ResolverError> {
        let result = self.resolve_inner(account_index, asset_id).await;
        if let Err(err) = &result {
            self.metrics.record_failure(err.kind());
            error!(error = %err, "Failed to resolve latest asset balance");
        }
        result
    }

    async fn resolve_inner(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
    ) -> Result<AccountAssetBalance, ResolverError> {
        let key = DataKey::account_asset(account_index, asset_id);

        let cached = store_call(self.config.call_timeout, self.backends.cache.get(&key))
            .await
            .map_err(ResolverError::cache)?;
        if let Some(balance) = cached {
            // Only canonical values are ever written, so anything else was
            // not written by a resolver.
            if !self.numeric.is_canonical(&balance) {
                return Err(ResolverError::CorruptCacheEntry {
                    key: key.to_string(),
                    value: balance,
                });
            }
            // Balance entries keep the TTL they were written with.
            self.metrics.record_cache_hit(EntryClass::Balance);
            debug!(balance = %balance, "Balance served from cache");
            return Ok(AccountAssetBalance::new(account_index, asset_id, balance));
        }
        self.metrics.record_cache_miss(EntryClass::Balance);

        let mut lock = LockHandle::acquire(
            Arc::clone(&self.backends.lock),
            key.lock_key(),
            self.config.lock_expiry,
            self.config.call_timeout,
        )
        .await;
        self.metrics.record_lock_outcome(lock.outcome());

        let recomputed = self
            .recompute(account_index, asset_id, &key, lock.is_held())
            .await;
        lock.release().await;

        Ok(AccountAssetBalance::new(account_index, asset_id, recomputed?))
    }

    async fn recompute(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
        key: &DataKey,
        lock_held: bool,
    ) -> Result<String, ResolverError> {
        let finalized = self.finalized_balance(account_index, asset_id).await?;

        let pending = store_call(
            self.config.call_timeout,
            self.backends
                .mempool
                .latest_asset_delta(account_index, asset_id, AssetKind::General),
        )
        .await
        .map_err(ResolverError::mempool)?;

        let balance = match pending {
            Some(delta) => {
                let balance = self.numeric.apply(
                    delta.asset_kind,
                    &delta.base_balance,
                    &delta.balance_delta,
                )?;
                debug!(
                    base = %delta.base_balance,
                    delta = %delta.balance_delta,
                    balance = %balance,
                    "Balance taken from pending delta"
                );
                balance
            }
            None => finalized,
        };

        if lock_held {
            store_call(
                self.config.call_timeout,
                self.backends
                    .cache
                    .set_with_expiry(key, &balance, self.config.balance_expiry),
            )
            .await
            .map_err(ResolverError::cache)?;
            self.metrics.record_repopulation(EntryClass::Balance);
            debug!(cache_key = %key, balance = %balance, "Balance cache entry repopulated");
        }

        Ok(balance)
    }

    /// Walks the finalized sources in order; `"0"` when none has a row.
    async fn finalized_balance(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
    ) -> Result<String, ResolverError> {
        for source in FINALIZED_BALANCE_CHAIN {
            let row = store_call(
                self.config.call_timeout,
                self.read_source(source, account_index, asset_id),
            )
            .await
            .map_err(ResolverError::history)?;

            if let Some(row) = row {
                debug!(source = %source, balance = %row.balance, "Finalized balance found");
                return Ok(self.numeric.canonicalize(&row.balance)?);
            }
        }

        debug!("Asset never held in finalized state");
        Ok(ZERO_BALANCE.to_string())
    }

    async fn read_source(
        &self,
        source: BalanceSource,
        account_index: AccountIndex,
        asset_id: AssetId,
    ) -> Result<Option<AccountAssetBalance>, StoreError> {
        match source {
            BalanceSource::AssetHistory => {
                self.backends
                    .history
                    .get_asset_history(account_index, asset_id)
                    .await
            }
            BalanceSource::BaseAssetTable => {
                self.backends
                    .history
                    .get_base_asset(account_index, asset_id)
                    .await
            }
        }
    }
}
