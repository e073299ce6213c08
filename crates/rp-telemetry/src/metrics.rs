//! Prometheus metrics for the state resolver.
//!
//! All metrics follow the naming convention: `rp_resolver_<metric>_total`
//!
//! Each [`PrometheusMetrics`] owns its registry, so several resolvers (or
//! tests) can run in one process without colliding on registration.

use prometheus::{CounterVec, Encoder, Opts, Registry, TextEncoder};
use rp_01_state_resolver::{EntryClass, LockOutcome, MetricsRecorder};

use crate::TelemetryError;

/// `MetricsRecorder` backed by labelled Prometheus counters.
pub struct PrometheusMetrics {
    registry: Registry,

    /// Cache lookups by entry class and result (hit/miss)
    cache_lookups: CounterVec,

    /// Lock attempts by outcome (held/denied/failed)
    lock_attempts: CounterVec,

    /// Cache entries written after recomputation, by entry class
    repopulations: CounterVec,

    /// Failed resolutions by error kind
    failures: CounterVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, TelemetryError> {
        let cache_lookups = CounterVec::new(
            Opts::new(
                "rp_resolver_cache_lookups_total",
                "Cache lookups by entry class and result",
            ),
            &["class", "result"],
        )
        .map_err(metrics_init)?;

        let lock_attempts = CounterVec::new(
            Opts::new(
                "rp_resolver_lock_attempts_total",
                "Recomputation lock attempts by outcome",
            ),
            &["outcome"],
        )
        .map_err(metrics_init)?;

        let repopulations = CounterVec::new(
            Opts::new(
                "rp_resolver_cache_repopulations_total",
                "Cache entries written after recomputation",
            ),
            &["class"],
        )
        .map_err(metrics_init)?;

        let failures = CounterVec::new(
            Opts::new("rp_resolver_failures_total", "Failed resolutions by error kind"),
            &["kind"],
        )
        .map_err(metrics_init)?;

        let registry = Registry::new();
        for collector in [&cache_lookups, &lock_attempts, &repopulations, &failures] {
            registry
                .register(Box::new(collector.clone()))
                .map_err(metrics_init)?;
        }

        Ok(Self {
            registry,
            cache_lookups,
            lock_attempts,
            repopulations,
            failures,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode all metrics as Prometheus text format.
    pub fn gather(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(metrics_init)?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
    }
}

fn metrics_init(err: prometheus::Error) -> TelemetryError {
    TelemetryError::MetricsInit(err.to_string())
}

impl MetricsRecorder for PrometheusMetrics {
    fn record_cache_hit(&self, class: EntryClass) {
        self.cache_lookups
            .with_label_values(&[class.label(), "hit"])
            .inc();
    }

    fn record_cache_miss(&self, class: EntryClass) {
        self.cache_lookups
            .with_label_values(&[class.label(), "miss"])
            .inc();
    }

    fn record_lock_outcome(&self, outcome: &LockOutcome) {
        self.lock_attempts
            .with_label_values(&[outcome.label()])
            .inc();
    }

    fn record_repopulation(&self, class: EntryClass) {
        self.repopulations.with_label_values(&[class.label()]).inc();
    }

    fn record_failure(&self, kind: &'static str) {
        self.failures.with_label_values(&[kind]).inc();
    }
}
