//! Service Layer
//!
//! Orchestrates the cache-aside protocol over the outbound ports:
//!
//! ```text
//! cache hit ──→ return (nonce entries get their TTL refreshed)
//!     │
//!    miss ──→ try lock (single attempt) ──→ recompute from mempool/history
//!                                               │
//!                          lock held? ──→ write cache ──→ release lock
//! ```
//!
//! A denied or failed lock never changes the answer, only whether it is
//! cached. An acquired lock is released on every exit path.

pub mod account_resolver;
pub mod asset_resolver;
mod deadline;
pub mod lock_scope;

pub use account_resolver::AccountStateResolver;
pub use asset_resolver::AssetStateResolver;
pub use lock_scope::LockHandle;

use async_trait::async_trait;
use shared_types::{AccountAssetBalance, AccountIndex, AccountRecord, AssetId};
use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::error::{ConfigError, ResolverError};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{CacheStore, DistributedLock, HistoryReader, MempoolReader, StateResolverApi};

/// Connections to the stores behind the resolver. All of them must be safe
/// for concurrent use; they are shared by every in-flight resolution.
#[derive(Clone)]
pub struct ResolverBackends {
    pub history: Arc<dyn HistoryReader>,
    pub mempool: Arc<dyn MempoolReader>,
    pub cache: Arc<dyn CacheStore>,
    pub lock: Arc<dyn DistributedLock>,
}

/// Implements [`StateResolverApi`] over one shared set of backends.
pub struct StateResolverService {
    accounts: AccountStateResolver,
    assets: AssetStateResolver,
}

impl StateResolverService {
    pub fn new(backends: ResolverBackends, config: ResolverConfig) -> Result<Self, ConfigError> {
        Self::with_metrics(backends, config, Arc::new(NoOpMetrics))
    }

    pub fn with_metrics(
        backends: ResolverBackends,
        config: ResolverConfig,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            accounts: AccountStateResolver::new(
                backends.clone(),
                config.clone(),
                Arc::clone(&metrics),
            ),
            assets: AssetStateResolver::new(backends, config, metrics),
        })
    }

    pub fn accounts(&self) -> &AccountStateResolver {
        &self.accounts
    }

    pub fn assets(&self) -> &AssetStateResolver {
        &self.assets
    }
}

#[async_trait]
impl StateResolverApi for StateResolverService {
    async fn resolve_latest_account(
        &self,
        account_index: AccountIndex,
    ) -> Result<AccountRecord, ResolverError> {
        self.accounts.resolve(account_index).await
    }

    async fn resolve_latest_asset(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
    ) -> Result<AccountAssetBalance, ResolverError> {
        self.assets.resolve(account_index, asset_id).await
    }
}
