//! Metrics hooks for resolution outcomes
//!
//! Counts cache hits and misses, the three lock outcomes, cache
//! repopulations and failed resolutions. Lock denials and lock backend
//! failures take the same path through the resolver, so these counters are
//! the only place they can be told apart.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::LockOutcome;

/// Entry class a cache event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryClass {
    Nonce,
    Balance,
}

impl EntryClass {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nonce => "nonce",
            Self::Balance => "balance",
        }
    }
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to integrate with external metrics systems.
pub trait MetricsRecorder: Send + Sync {
    fn record_cache_hit(&self, class: EntryClass);

    fn record_cache_miss(&self, class: EntryClass);

    fn record_lock_outcome(&self, outcome: &LockOutcome);

    fn record_repopulation(&self, class: EntryClass);

    /// `kind` is [`crate::ResolverError::kind`].
    fn record_failure(&self, kind: &'static str);
}

/// Thread-safe counters for resolver activity.
#[derive(Default)]
pub struct Metrics {
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub locks_held: AtomicU64,
    pub locks_denied: AtomicU64,
    pub lock_errors: AtomicU64,
    pub repopulations: AtomicU64,
    pub failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            locks_held: self.locks_held.load(Ordering::Relaxed),
            locks_denied: self.locks_denied.load(Ordering::Relaxed),
            lock_errors: self.lock_errors.load(Ordering::Relaxed),
            repopulations: self.repopulations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    /// Fraction of lookups answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let total = hits + self.cache_misses.load(Ordering::Relaxed);
        if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        }
    }

    pub fn reset(&self) {
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.locks_held.store(0, Ordering::Relaxed);
        self.locks_denied.store(0, Ordering::Relaxed);
        self.lock_errors.store(0, Ordering::Relaxed);
        self.repopulations.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
    }
}

impl MetricsRecorder for Metrics {
    fn record_cache_hit(&self, _class: EntryClass) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_cache_miss(&self, _class: EntryClass) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_lock_outcome(&self, outcome: &LockOutcome) {
        let counter = match outcome {
            LockOutcome::Held => &self.locks_held,
            LockOutcome::Denied => &self.locks_denied,
            LockOutcome::Failed(_) => &self.lock_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_repopulation(&self, _class: EntryClass) {
        self.repopulations.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self, _kind: &'static str) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub locks_held: u64,
    pub locks_denied: u64,
    pub lock_errors: u64,
    pub repopulations: u64,
    pub failures: u64,
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_cache_hit(&self, _: EntryClass) {}
    fn record_cache_miss(&self, _: EntryClass) {}
    fn record_lock_outcome(&self, _: &LockOutcome) {}
    fn record_repopulation(&self, _: EntryClass) {}
    fn record_failure(&self, _: &'static str) {}
}
