//! Instrumented in-memory backends.

use async_trait::async_trait;
use rp_01_state_resolver::{
    CacheStore, DataKey, DistributedLock, InMemoryCacheStore, InMemoryHistoryStore,
    InMemoryLockManager, InMemoryMempool, LockError, LockKey, ManualClock, MempoolReader,
    MetricsRecorder, ResolverBackends, ResolverConfig, StateResolverService,
};
use shared_types::{
    AccountIndex, AccountRecord, AssetId, AssetKind, PendingAssetDelta, PendingTxRecord,
    StoreError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Mempool that counts reads and can stall them, widening the window in
/// which concurrent resolutions overlap.
pub struct SlowMempool {
    pub inner: InMemoryMempool,
    delay: Duration,
    reads: AtomicUsize,
}

impl SlowMempool {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryMempool::new(),
            delay,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    async fn stall(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl MempoolReader for SlowMempool {
    async fn latest_pending_tx(
        &self,
        account_index: AccountIndex,
    ) -> Result<Option<PendingTxRecord>, StoreError> {
        self.stall().await;
        self.inner.latest_pending_tx(account_index).await
    }

    async fn latest_asset_delta(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
        kind: AssetKind,
    ) -> Result<Option<PendingAssetDelta>, StoreError> {
        self.stall().await;
        self.inner
            .latest_asset_delta(account_index, asset_id, kind)
            .await
    }
}

/// Lock that records how many owners held it at once.
pub struct TrackingLock {
    pub inner: InMemoryLockManager,
    acquired: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl TrackingLock {
    pub fn new(inner: InMemoryLockManager) -> Self {
        Self {
            inner,
            acquired: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DistributedLock for TrackingLock {
    async fn try_acquire(
        &self,
        key: &LockKey,
        owner: &str,
        ttl: Duration,
    ) -> Result<bool, LockError> {
        let held = self.inner.try_acquire(key, owner, ttl).await?;
        if held {
            self.acquired.fetch_add(1, Ordering::SeqCst);
            let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now_active, Ordering::SeqCst);
        }
        Ok(held)
    }

    async fn release(&self, key: &LockKey, owner: &str) -> Result<bool, LockError> {
        let released = self.inner.release(key, owner).await?;
        if released {
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(released)
    }
}

/// Cache that counts writes.
pub struct CountingCache {
    pub inner: InMemoryCacheStore,
    writes: AtomicUsize,
}

impl CountingCache {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for CountingCache {
    async fn get(&self, key: &DataKey) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set_with_expiry(
        &self,
        key: &DataKey,
        value: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_with_expiry(key, value, ttl).await
    }

    async fn touch(&self, key: &DataKey, ttl: Duration) -> Result<(), StoreError> {
        self.inner.touch(key, ttl).await
    }
}

/// Every backend of one deployment, sharing a manual clock.
pub struct Stack {
    pub clock: Arc<ManualClock>,
    pub history: Arc<InMemoryHistoryStore>,
    pub mempool: Arc<SlowMempool>,
    pub cache: Arc<CountingCache>,
    pub lock: Arc<TrackingLock>,
}

impl Stack {
    pub fn new() -> Self {
        Self::with_mempool_delay(Duration::ZERO)
    }

    pub fn with_mempool_delay(delay: Duration) -> Self {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        Self {
            history: Arc::new(InMemoryHistoryStore::new()),
            mempool: Arc::new(SlowMempool::new(delay)),
            cache: Arc::new(CountingCache {
                inner: InMemoryCacheStore::with_clock(clock.clone()),
                writes: AtomicUsize::new(0),
            }),
            lock: Arc::new(TrackingLock::new(InMemoryLockManager::with_clock(
                clock.clone(),
            ))),
            clock,
        }
    }

    pub fn backends(&self) -> ResolverBackends {
        ResolverBackends {
            history: self.history.clone(),
            mempool: self.mempool.clone(),
            cache: self.cache.clone(),
            lock: self.lock.clone(),
        }
    }

    pub fn service(&self) -> StateResolverService {
        self.service_with(ResolverConfig::default())
    }

    pub fn service_with(&self, config: ResolverConfig) -> StateResolverService {
        StateResolverService::new(self.backends(), config).unwrap()
    }

    pub fn service_with_metrics(&self, metrics: Arc<dyn MetricsRecorder>) -> StateResolverService {
        StateResolverService::with_metrics(self.backends(), ResolverConfig::default(), metrics)
            .unwrap()
    }

    pub fn add_account(&self, account_index: AccountIndex, nonce: u64) {
        self.history.upsert_account(AccountRecord {
            account_index,
            account_name: format!("acct{account_index}.legend"),
            public_key: format!("0xpk{account_index:04x}"),
            account_name_hash: format!("0xnh{account_index:04x}"),
            l1_address: format!("0x{account_index:040x}"),
            nonce,
        });
    }

    pub fn submit_tx(&self, account_index: AccountIndex, nonce: u64) {
        self.mempool
            .inner
            .submit_tx(PendingTxRecord { account_index, nonce });
    }

    pub fn submit_delta(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
        base: &str,
        delta: &str,
    ) {
        self.mempool.inner.submit_asset_delta(PendingAssetDelta {
            account_index,
            asset_id,
            asset_kind: AssetKind::General,
            base_balance: base.to_string(),
            balance_delta: delta.to_string(),
        });
    }
}
