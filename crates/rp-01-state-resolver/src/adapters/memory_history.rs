//! In-memory finalized history store
//!
//! Holds account rows, per-transaction asset balance snapshots and the base
//! asset table. Snapshots are appended in finalization order; the latest one
//! answers [`HistoryReader::get_asset_history`].

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{AccountAssetBalance, AccountIndex, AccountRecord, AssetId, StoreError};
use std::collections::HashMap;

use crate::ports::HistoryReader;

#[derive(Default)]
pub struct InMemoryHistoryStore {
    accounts: RwLock<HashMap<AccountIndex, AccountRecord>>,
    asset_history: RwLock<HashMap<(AccountIndex, AssetId), Vec<AccountAssetBalance>>>,
    base_assets: RwLock<HashMap<(AccountIndex, AssetId), AccountAssetBalance>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an account row.
    pub fn upsert_account(&self, account: AccountRecord) {
        self.accounts.write().insert(account.account_index, account);
    }

    /// Appends a finalized balance snapshot.
    pub fn append_asset_history(&self, balance: AccountAssetBalance) {
        self.asset_history
            .write()
            .entry((balance.account_index, balance.asset_id))
            .or_default()
            .push(balance);
    }

    /// Inserts or replaces a base asset table row.
    pub fn set_base_asset(&self, balance: AccountAssetBalance) {
        self.base_assets
            .write()
            .insert((balance.account_index, balance.asset_id), balance);
    }

    /// Sets the finalized nonce of an existing account.
    pub fn finalize_nonce(&self, account_index: AccountIndex, nonce: u64) -> bool {
        match self.accounts.write().get_mut(&account_index) {
            Some(account) => {
                account.nonce = nonce;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl HistoryReader for InMemoryHistoryStore {
    async fn get_account_by_index(
        &self,
        account_index: AccountIndex,
    ) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.accounts.read().get(&account_index).cloned())
    }

    async fn get_asset_history(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
    ) -> Result<Option<AccountAssetBalance>, StoreError> {
        Ok(self
            .asset_history
            .read()
            .get(&(account_index, asset_id))
            .and_then(|snapshots| snapshots.last().cloned()))
    }

    async fn get_base_asset(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
    ) -> Result<Option<AccountAssetBalance>, StoreError> {
        Ok(self
            .base_assets
            .read()
            .get(&(account_index, asset_id))
            .cloned())
    }
}
