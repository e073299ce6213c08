//! # Cache-Aside Flows
//!
//! End-to-end resolution over one shared set of backends: repopulation on
//! miss, hits on repeat calls, expiry at the TTL boundary and the hand-off
//! from mempool to history when an account is finalized.

use rand::Rng;
use rp_01_state_resolver::{
    CacheStore, DataKey, ResolverConfig, ResolverError, StateResolverApi,
};
use shared_types::AccountAssetBalance;
use std::time::Duration;

use super::fixtures::Stack;

const TTL: Duration = Duration::from_secs(30);

#[tokio::test]
async fn test_unseen_account_is_cached_with_finalized_nonce() -> anyhow::Result<()> {
    let stack = Stack::new();
    stack.add_account(42, 5);
    let service = stack.service();

    let account = service.resolve_latest_account(42).await?;

    assert_eq!(account.account_index, 42);
    assert_eq!(account.nonce, 5);
    assert_eq!(account.account_name, "acct42.legend");

    let key = DataKey::account_nonce(42);
    assert_eq!(stack.cache.get(&key).await?, Some("5".to_string()));
    assert_eq!(stack.cache.inner.ttl_remaining(&key), Some(TTL));
    assert_eq!(stack.lock.active(), 0);
    Ok(())
}

#[tokio::test]
async fn test_repeat_call_served_without_mempool() -> anyhow::Result<()> {
    let stack = Stack::new();
    stack.add_account(7, 10);
    stack.submit_tx(7, 11);
    stack.submit_tx(7, 12);
    let service = stack.service();

    let first = service.resolve_latest_account(7).await?;
    let reads = stack.mempool.reads();
    let second = service.resolve_latest_account(7).await?;

    assert_eq!(first.nonce, 12);
    assert_eq!(first, second);
    assert_eq!(stack.mempool.reads(), reads);
    assert_eq!(stack.cache.writes(), 1);
    Ok(())
}

#[tokio::test]
async fn test_cached_balance_expires_at_ttl_boundary() -> anyhow::Result<()> {
    let stack = Stack::new();
    stack
        .history
        .append_asset_history(AccountAssetBalance::new(3, 1, "1000"));
    let service = stack.service();

    assert_eq!(service.resolve_latest_asset(3, 1).await?.balance, "1000");

    // A debit lands in the mempool while the old balance is still cached.
    stack.submit_delta(3, 1, "1000", "-250");

    stack.clock.advance(TTL - Duration::from_millis(1));
    assert_eq!(service.resolve_latest_asset(3, 1).await?.balance, "1000");

    stack.clock.advance(Duration::from_millis(1));
    assert_eq!(service.resolve_latest_asset(3, 1).await?.balance, "750");
    assert_eq!(stack.cache.writes(), 2);
    Ok(())
}

#[tokio::test]
async fn test_nonce_entry_stays_live_while_read() -> anyhow::Result<()> {
    let stack = Stack::new();
    stack.add_account(9, 1);
    let service = stack.service();

    service.resolve_latest_account(9).await?;
    for _ in 0..5 {
        stack.clock.advance(Duration::from_secs(20));
        service.resolve_latest_account(9).await?;
    }

    // 100s after the write, the entry is still live and was written once.
    assert_eq!(stack.cache.writes(), 1);
    assert_eq!(
        stack.cache.inner.ttl_remaining(&DataKey::account_nonce(9)),
        Some(TTL)
    );
    Ok(())
}

#[tokio::test]
async fn test_finalization_hands_off_to_history() -> anyhow::Result<()> {
    let stack = Stack::new();
    stack.add_account(5, 3);
    stack.history.set_base_asset(AccountAssetBalance::new(5, 0, "100"));
    stack.submit_tx(5, 4);
    stack.submit_delta(5, 0, "100", "-40");
    let service = stack.service();

    assert_eq!(service.resolve_latest_account(5).await?.nonce, 4);
    assert_eq!(service.resolve_latest_asset(5, 0).await?.balance, "60");

    // The block carrying both transactions finalizes.
    assert!(stack.history.finalize_nonce(5, 4));
    stack
        .history
        .append_asset_history(AccountAssetBalance::new(5, 0, "60"));
    assert_eq!(stack.mempool.inner.finalize_account(5), 2);

    stack.clock.advance(TTL);
    assert_eq!(service.resolve_latest_account(5).await?.nonce, 4);
    assert_eq!(service.resolve_latest_asset(5, 0).await?.balance, "60");
    Ok(())
}

#[tokio::test]
async fn test_wide_balances_are_exact() -> anyhow::Result<()> {
    let stack = Stack::new();
    stack.submit_delta(1, 0, "100000000000000000000", "-1");
    stack.submit_delta(2, 0, "340282366920938463463374607431768211455", "+1");
    let service = stack.service();

    assert_eq!(
        service.resolve_latest_asset(1, 0).await?.balance,
        "99999999999999999999"
    );
    assert_eq!(
        service.resolve_latest_asset(2, 0).await?.balance,
        "340282366920938463463374607431768211456"
    );
    Ok(())
}

#[tokio::test]
async fn test_untouched_pairs_resolve_to_zero() -> anyhow::Result<()> {
    let stack = Stack::new();
    stack.history.set_base_asset(AccountAssetBalance::new(1, 1, "5"));
    let service = stack.service();
    let mut rng = rand::thread_rng();

    for _ in 0..32 {
        let account = rng.gen_range(1_000..u64::MAX);
        let asset = rng.gen_range(0..u64::MAX);
        let resolved = service.resolve_latest_asset(account, asset).await?;
        assert_eq!(resolved, AccountAssetBalance::zero(account, asset));
    }
    Ok(())
}

#[tokio::test]
async fn test_malformed_delta_never_reaches_cache() {
    let stack = Stack::new();
    stack.submit_delta(4, 2, "10", "abc");
    let service = stack.service();

    let err = service.resolve_latest_asset(4, 2).await.unwrap_err();

    assert!(matches!(err, ResolverError::Computation(_)));
    assert_eq!(stack.cache.writes(), 0);
    assert_eq!(stack.lock.active(), 0);
}

#[tokio::test]
async fn test_unknown_account_rejected() {
    let stack = Stack::new();
    let service = stack.service();

    let err = service.resolve_latest_account(404).await.unwrap_err();

    assert!(matches!(
        err,
        ResolverError::InvalidAccount { account_index: 404 }
    ));
    assert_eq!(stack.lock.acquired(), 0);
}

#[tokio::test]
async fn test_negative_result_policy() -> anyhow::Result<()> {
    let stack = Stack::new();
    stack.submit_delta(8, 0, "5", "-6");

    let strict = stack.service();
    assert!(matches!(
        strict.resolve_latest_asset(8, 0).await,
        Err(ResolverError::Computation(_))
    ));

    let lenient = stack.service_with(ResolverConfig::default().with_allow_negative_balance(true));
    assert_eq!(lenient.resolve_latest_asset(8, 0).await?.balance, "-1");
    Ok(())
}
