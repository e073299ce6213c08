//! Cache and lock key derivation
//!
//! Data keys live under the `cache:` namespace and carry an entity tag, so
//! two entity kinds never share a key. A lock key is `lock:` followed by the
//! full data key, which keeps the lock namespace disjoint from every data key
//! while staying a pure function of it.

use shared_types::{AccountIndex, AssetId};
use std::fmt;

const DATA_NAMESPACE: &str = "cache";
const LOCK_NAMESPACE: &str = "lock";

/// Logical entity whose latest value is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheEntity {
    /// Latest nonce of an account.
    AccountNonce { account_index: AccountIndex },
    /// Latest balance of one asset held by an account.
    AccountAsset {
        account_index: AccountIndex,
        asset_id: AssetId,
    },
}

impl CacheEntity {
    fn tag(&self) -> &'static str {
        match self {
            Self::AccountNonce { .. } => "account_nonce",
            Self::AccountAsset { .. } => "account_asset",
        }
    }
}

/// Key of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataKey(String);

impl DataKey {
    pub fn for_entity(entity: CacheEntity) -> Self {
        let key = match entity {
            CacheEntity::AccountNonce { account_index } => {
                format!("{}:{}:{}", DATA_NAMESPACE, entity.tag(), account_index)
            }
            CacheEntity::AccountAsset {
                account_index,
                asset_id,
            } => format!(
                "{}:{}:{}:{}",
                DATA_NAMESPACE,
                entity.tag(),
                account_index,
                asset_id
            ),
        };
        Self(key)
    }

    pub fn account_nonce(account_index: AccountIndex) -> Self {
        Self::for_entity(CacheEntity::AccountNonce { account_index })
    }

    pub fn account_asset(account_index: AccountIndex, asset_id: AssetId) -> Self {
        Self::for_entity(CacheEntity::AccountAsset {
            account_index,
            asset_id,
        })
    }

    /// Companion lock guarding recomputation of this entry.
    pub fn lock_key(&self) -> LockKey {
        LockKey(format!("{}:{}", LOCK_NAMESPACE, self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of a distributed lock. Only obtainable from a [`DataKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockKey(String);

impl LockKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
