//! # Metrics Wiring
//!
//! The resolver reports through `MetricsRecorder`; both the in-process
//! counters and the Prometheus recorder must see the same activity.

use rp_01_state_resolver::{DataKey, DistributedLock, Metrics, StateResolverApi};
use rp_telemetry::PrometheusMetrics;
use std::sync::Arc;
use std::time::Duration;

use super::fixtures::Stack;

#[tokio::test]
async fn test_prometheus_recorder_sees_resolutions() -> anyhow::Result<()> {
    let stack = Stack::new();
    stack.add_account(1, 0);
    stack.submit_delta(1, 0, "1", "x");
    let metrics = Arc::new(PrometheusMetrics::new()?);
    let service = stack.service_with_metrics(metrics.clone());

    service.resolve_latest_account(1).await?;
    service.resolve_latest_account(1).await?;
    assert!(service.resolve_latest_asset(1, 0).await.is_err());

    let text = metrics.gather()?;
    assert!(text.contains("rp_resolver_cache_lookups_total{class=\"nonce\",result=\"hit\"} 1"));
    assert!(text.contains("rp_resolver_cache_lookups_total{class=\"nonce\",result=\"miss\"} 1"));
    assert!(text.contains("rp_resolver_lock_attempts_total{outcome=\"held\"} 2"));
    assert!(text.contains("rp_resolver_cache_repopulations_total{class=\"nonce\"} 1"));
    assert!(text.contains("rp_resolver_failures_total{kind=\"computation\"} 1"));
    Ok(())
}

#[tokio::test]
async fn test_denied_lock_counted_separately() -> anyhow::Result<()> {
    let stack = Stack::new();
    stack.add_account(2, 6);
    let key = DataKey::account_nonce(2).lock_key();
    assert!(
        stack
            .lock
            .inner
            .try_acquire(&key, "another-node", Duration::from_secs(10))
            .await?
    );
    let metrics = Arc::new(Metrics::new());
    let service = stack.service_with_metrics(metrics.clone());

    assert_eq!(service.resolve_latest_account(2).await?.nonce, 6);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.locks_denied, 1);
    assert_eq!(snapshot.locks_held, 0);
    assert_eq!(snapshot.repopulations, 0);
    assert_eq!(stack.cache.writes(), 0);
    Ok(())
}
