//! Error types for the state resolver

use shared_types::{AccountIndex, AssetKind, StoreError};
use std::fmt;
use thiserror::Error;

/// Tier a storage failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    History,
    Mempool,
    Cache,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::History => write!(f, "history"),
            Self::Mempool => write!(f, "mempool"),
            Self::Cache => write!(f, "cache"),
        }
    }
}

/// Errors surfaced to callers of the resolver.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Invalid account index: {account_index}")]
    InvalidAccount { account_index: AccountIndex },

    #[error("Storage error in {tier} tier: {source}")]
    Storage {
        tier: Tier,
        #[source]
        source: StoreError,
    },

    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),

    #[error("Corrupt cache entry at {key}: {value:?}")]
    CorruptCacheEntry { key: String, value: String },
}

impl ResolverError {
    pub fn history(source: StoreError) -> Self {
        Self::Storage {
            tier: Tier::History,
            source,
        }
    }

    pub fn mempool(source: StoreError) -> Self {
        Self::Storage {
            tier: Tier::Mempool,
            source,
        }
    }

    pub fn cache(source: StoreError) -> Self {
        Self::Storage {
            tier: Tier::Cache,
            source,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAccount { .. } => "invalid_account",
            Self::Storage { .. } => "storage",
            Self::Computation(_) => "computation",
            Self::CorruptCacheEntry { .. } => "corrupt_cache_entry",
        }
    }
}

/// Malformed or out-of-domain operands in balance arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputationError {
    #[error("Malformed base balance: {0:?}")]
    MalformedBase(String),

    #[error("Malformed balance delta: {0:?}")]
    MalformedDelta(String),

    #[error("Balance would go negative: {base} + ({delta})")]
    NegativeBalance { base: String, delta: String },

    #[error("Balance arithmetic not defined for {0} assets")]
    UnsupportedAssetKind(AssetKind),
}

/// Failures of the distributed lock backend.
///
/// Never returned to resolver callers; only logged and counted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    #[error("Lock backend error: {0}")]
    Backend(String),

    #[error("Lock backend timeout")]
    Timeout,
}

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
