//! # Ledger Entities
//!
//! ## Clusters
//!
//! - **Finalized**: `AccountRecord`, `AccountAssetBalance`
//! - **Pending**: `PendingTxRecord`, `PendingAssetDelta`
//! - **Identifiers**: `AccountIndex`, `AssetId`, `AssetKind`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an account. Immutable once assigned.
pub type AccountIndex = u64;

/// Identifier of a fungible asset type in the asset registry.
pub type AssetId = u64;

/// Per-account transaction sequence counter.
pub type Nonce = u64;

/// Balance value used when an account has never held an asset.
pub const ZERO_BALANCE: &str = "0";

// =============================================================================
// FINALIZED STATE
// =============================================================================

/// Account identity plus its finalized nonce.
///
/// The nonce is written only by the finalization pipeline. Readers may
/// overlay a fresher pending nonce on a copy, never on the stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_index: AccountIndex,
    pub account_name: String,
    /// Hex-encoded public key.
    pub public_key: String,
    /// Hex-encoded hash of the account name.
    pub account_name_hash: String,
    pub l1_address: String,
    pub nonce: Nonce,
}

/// Balance of one asset held by one account.
///
/// `balance` is a non-negative integer in canonical decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAssetBalance {
    pub account_index: AccountIndex,
    pub asset_id: AssetId,
    pub balance: String,
}

impl AccountAssetBalance {
    pub fn new(account_index: AccountIndex, asset_id: AssetId, balance: impl Into<String>) -> Self {
        Self {
            account_index,
            asset_id,
            balance: balance.into(),
        }
    }

    /// Balance of an asset the account has never touched.
    pub fn zero(account_index: AccountIndex, asset_id: AssetId) -> Self {
        Self::new(account_index, asset_id, ZERO_BALANCE)
    }
}

// =============================================================================
// PENDING STATE
// =============================================================================

/// Nonce an account would have after its most recent pending transaction.
///
/// Complete on its own: it replaces the finalized nonce, it is never added
/// to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTxRecord {
    pub account_index: AccountIndex,
    pub nonce: Nonce,
}

/// Category of asset touched by a pending transaction detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Fungible balance: base and delta are signed decimal integers.
    General,
    /// Liquidity pool share.
    Liquidity,
    /// Non-fungible token ownership.
    Nft,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General => write!(f, "general"),
            Self::Liquidity => write!(f, "liquidity"),
            Self::Nft => write!(f, "nft"),
        }
    }
}

/// Signed balance adjustment from the most recent pending transaction that
/// touched an (account, asset) pair.
///
/// `base_balance` is the snapshot captured when the pending record was
/// created; the adjusted balance is `base_balance + balance_delta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAssetDelta {
    pub account_index: AccountIndex,
    pub asset_id: AssetId,
    pub asset_kind: AssetKind,
    pub base_balance: String,
    pub balance_delta: String,
}
