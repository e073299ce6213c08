//! # Stampede Protection
//!
//! Many tasks miss the same cold key at once. At most one of them may hold
//! the recomputation lock at any instant; every task must still get the
//! right answer, and only lock holders write the cache.

use futures::future::join_all;
use rp_01_state_resolver::{CacheStore, DataKey, StateResolverApi, StateResolverService};
use shared_types::AccountAssetBalance;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

use super::fixtures::Stack;

const TASKS: usize = 32;
const MEMPOOL_DELAY: Duration = Duration::from_millis(50);

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_balance_misses_single_writer() -> anyhow::Result<()> {
    let stack = Stack::with_mempool_delay(MEMPOOL_DELAY);
    stack
        .history
        .set_base_asset(AccountAssetBalance::new(11, 3, "900"));
    stack.submit_delta(11, 3, "900", "-1");
    let service = Arc::new(stack.service());
    let barrier = Arc::new(Barrier::new(TASKS));

    let handles = (0..TASKS).map(|_| {
        let service = Arc::clone(&service);
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            service.resolve_latest_asset(11, 3).await
        })
    });

    for joined in join_all(handles).await {
        let balance = joined??;
        assert_eq!(balance.balance, "899");
    }

    assert_eq!(stack.lock.max_active(), 1);
    assert!(stack.lock.acquired() >= 1);
    assert_eq!(stack.cache.writes(), stack.lock.acquired());
    assert_eq!(stack.lock.active(), 0);
    assert_eq!(
        stack.cache.get(&DataKey::account_asset(11, 3)).await?,
        Some("899".to_string())
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_nonce_misses_single_writer() -> anyhow::Result<()> {
    let stack = Stack::with_mempool_delay(MEMPOOL_DELAY);
    stack.add_account(12, 40);
    stack.submit_tx(12, 41);
    let service = Arc::new(stack.service());
    let barrier = Arc::new(Barrier::new(TASKS));

    let handles = (0..TASKS).map(|_| {
        let service = Arc::clone(&service);
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            service.resolve_latest_account(12).await
        })
    });

    for joined in join_all(handles).await {
        assert_eq!(joined??.nonce, 41);
    }

    assert_eq!(stack.lock.max_active(), 1);
    assert_eq!(stack.cache.writes(), stack.lock.acquired());
    assert_eq!(stack.lock.active(), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_keys_do_not_contend() -> anyhow::Result<()> {
    let stack = Stack::with_mempool_delay(MEMPOOL_DELAY);
    for asset in 0..8u64 {
        stack.submit_delta(20, asset, "10", &asset.to_string());
    }
    let service: Arc<StateResolverService> = Arc::new(stack.service());
    let barrier = Arc::new(Barrier::new(8));

    let handles = (0..8u64).map(|asset| {
        let service = Arc::clone(&service);
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            service.resolve_latest_asset(20, asset).await
        })
    });

    for (asset, joined) in join_all(handles).await.into_iter().enumerate() {
        assert_eq!(joined??.balance, (10 + asset).to_string());
    }

    // Every key had its own lock, so every task repopulated its entry.
    assert_eq!(stack.lock.acquired(), 8);
    assert_eq!(stack.cache.writes(), 8);
    Ok(())
}
