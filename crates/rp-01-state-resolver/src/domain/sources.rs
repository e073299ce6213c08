//! Finalized balance sources, in fallback order

use std::fmt;

/// Where a finalized balance can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceSource {
    /// Per-transaction balance snapshots of finalized history.
    AssetHistory,
    /// The base asset table.
    BaseAssetTable,
}

/// Sources consulted for a finalized balance, first match wins.
///
/// When none has a row the account never held the asset and the balance is
/// zero.
pub const FINALIZED_BALANCE_CHAIN: [BalanceSource; 2] =
    [BalanceSource::AssetHistory, BalanceSource::BaseAssetTable];

impl fmt::Display for BalanceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssetHistory => write!(f, "asset_history"),
            Self::BaseAssetTable => write!(f, "base_asset_table"),
        }
    }
}
