//! Inbound Ports (Driving Ports)
//!
//! The API callers use to read the freshest known account state.

use async_trait::async_trait;
use shared_types::{AccountAssetBalance, AccountIndex, AccountRecord, AssetId};

use crate::error::ResolverError;

/// Latest-state read API (Driving Port)
#[async_trait]
pub trait StateResolverApi: Send + Sync {
    /// Account identity with the freshest known nonce.
    ///
    /// Pending nonce if the account has a pending transaction, finalized
    /// nonce otherwise. Fails with `InvalidAccount` for an unknown index.
    async fn resolve_latest_account(
        &self,
        account_index: AccountIndex,
    ) -> Result<AccountRecord, ResolverError>;

    /// Freshest known balance of one asset.
    ///
    /// Pending base plus delta if a pending record exists, else the
    /// finalized balance, else `"0"`.
    async fn resolve_latest_asset(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
    ) -> Result<AccountAssetBalance, ResolverError>;
}
