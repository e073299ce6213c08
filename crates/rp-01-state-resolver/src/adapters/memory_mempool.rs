//! In-memory mempool store
//!
//! Pending transactions and asset details are kept in submission order per
//! account; the last submitted record is the latest. Finalizing an account
//! drops its pending records.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{
    AccountIndex, AssetId, AssetKind, PendingAssetDelta, PendingTxRecord, StoreError,
};
use std::collections::HashMap;

use crate::ports::MempoolReader;

type DetailKey = (AccountIndex, AssetId, AssetKind);

#[derive(Default)]
struct PendingState {
    txs: HashMap<AccountIndex, Vec<PendingTxRecord>>,
    details: HashMap<DetailKey, Vec<PendingAssetDelta>>,
}

#[derive(Default)]
pub struct InMemoryMempool {
    state: RwLock<PendingState>,
}

impl InMemoryMempool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_tx(&self, tx: PendingTxRecord) {
        self.state
            .write()
            .txs
            .entry(tx.account_index)
            .or_default()
            .push(tx);
    }

    pub fn submit_asset_delta(&self, delta: PendingAssetDelta) {
        self.state
            .write()
            .details
            .entry((delta.account_index, delta.asset_id, delta.asset_kind))
            .or_default()
            .push(delta);
    }

    /// Drops every pending record of an account, as finalization does.
    /// Returns the number of records removed.
    pub fn finalize_account(&self, account_index: AccountIndex) -> usize {
        let mut state = self.state.write();
        let txs = state.txs.remove(&account_index).map_or(0, |txs| txs.len());

        let before: usize = state.details.values().map(Vec::len).sum();
        state.details.retain(|(account, _, _), _| *account != account_index);
        let after: usize = state.details.values().map(Vec::len).sum();

        txs + (before - after)
    }

    /// Total pending records.
    pub fn pending_count(&self) -> usize {
        let state = self.state.read();
        state.txs.values().map(Vec::len).sum::<usize>()
            + state.details.values().map(Vec::len).sum::<usize>()
    }
}

#[async_trait]
impl MempoolReader for InMemoryMempool {
    async fn latest_pending_tx(
        &self,
        account_index: AccountIndex,
    ) -> Result<Option<PendingTxRecord>, StoreError> {
        Ok(self
            .state
            .read()
            .txs
            .get(&account_index)
            .and_then(|txs| txs.last().copied()))
    }

    async fn latest_asset_delta(
        &self,
        account_index: AccountIndex,
        asset_id: AssetId,
        kind: AssetKind,
    ) -> Result<Option<PendingAssetDelta>, StoreError> {
        Ok(self
            .state
            .read()
            .details
            .get(&(account_index, asset_id, kind))
            .and_then(|details| details.last().cloned()))
    }
}
