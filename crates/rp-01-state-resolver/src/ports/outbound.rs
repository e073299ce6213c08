//! Outbound Ports (Driven Ports)
//!
//! Stores and backends the resolver reads from and writes to. Every method is
//! a network call in production, so every method is async and none of them
//! may be invoked while holding an in-process lock.
//!
//! Readers answer `Ok(None)` for a missing row. `Err` is reserved for backend
//! failures.

use async_trait::async_trait;
use shared_types::{
    AccountAssetBalance, AccountIndex, AccountRecord, AssetId, AssetKind, PendingAssetDelta,
    PendingTxRecord, StoreError,
};
use std::time::Duration;

use crate::domain::{DataKey, LockKey};
use crate::error::LockError;

/// Milliseconds since the UNIX epoch.
pub type Timestamp = u64;

/// Read-only access to finalized account and asset state.
#[async_trait]
pub trait HistoryReader: Send + Sync {
    /// Account identity and finalized nonce.
    async fn get_account_by_index(
        &self,
        account_index: AccountIndex,
    ) -> Result<Option<AccountRecord>, StoreError>;

    /// Most recent finalized per-transaction balance snapshot.
    async fn get_asset_history(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
    ) -> Result<Option<AccountAssetBalance>, StoreError>;

    /// Row of the base asset table.
    async fn get_base_asset(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
    ) -> Result<Option<AccountAssetBalance>, StoreError>;
}

/// Read-only access to pending (not yet finalized) transactions.
///
/// "Latest" follows the mempool's own submission order.
#[async_trait]
pub trait MempoolReader: Send + Sync {
    async fn latest_pending_tx(
        &self,
        account_index: AccountIndex,
    ) -> Result<Option<PendingTxRecord>, StoreError>;

    async fn latest_asset_delta(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
        kind: AssetKind,
    ) -> Result<Option<PendingAssetDelta>, StoreError>;
}

/// Remote key-value cache with per-entry expiry.
///
/// An entry past its expiry must read as absent.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &DataKey) -> Result<Option<String>, StoreError>;

    async fn set_with_expiry(
        &self,
        key: &DataKey,
        value: &str,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    /// Pushes the expiry of a live entry `ttl` into the future without
    /// changing its value. A no-op for absent entries.
    async fn touch(&self, key: &DataKey, ttl: Duration) -> Result<(), StoreError>;
}

/// Remote mutual exclusion keyed by [`LockKey`].
///
/// `owner` is an opaque token identifying one acquisition; only the owner
/// that set a lock can release it.
#[async_trait]
pub trait DistributedLock: Send + Sync {
    /// Single attempt, never waits or retries.
    ///
    /// Returns `Ok(true)` if the lock was free and is now held by `owner`
    /// for at most `ttl`, `Ok(false)` if someone else holds it.
    async fn try_acquire(
        &self,
        key: &LockKey,
        owner: &str,
        ttl: Duration,
    ) -> Result<bool, LockError>;

    /// Releases the lock if `owner` still holds it.
    ///
    /// Returns `Ok(false)` when there was nothing to release (expired, or
    /// taken over by another owner).
    async fn release(&self, key: &LockKey, owner: &str) -> Result<bool, LockError>;
}

/// Time source for expiry bookkeeping in the in-memory adapters.
///
/// Abstracted to allow testing with deterministic time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
