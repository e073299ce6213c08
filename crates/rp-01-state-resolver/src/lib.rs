//! # RP-01 State Resolver
//!
//! Latest account nonce and asset balance resolution for the read path of a
//! rollup ledger. Answers merge three tiers, freshest first: a TTL cache, the
//! mempool of submitted-but-unfinalized transactions, and finalized history.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `DataKey` / `LockKey`: Deterministic cache and lock key derivation
//!   - `NumericDelta`: Arbitrary-precision `base + delta` on decimal strings
//!   - `LockOutcome`: Held / Denied / Failed, never conflated
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `StateResolverApi`: Driving port (inbound API)
//!   - `HistoryReader`, `MempoolReader`, `CacheStore`, `DistributedLock`,
//!     `Clock`: Driven ports
//!
//! - **Service Layer** (`service/`): Cache-aside orchestration
//!   - `StateResolverService`: Implements `StateResolverApi`
//!   - `LockHandle`: One-shot stampede lock, released on every exit path
//!
//! - **Adapters Layer** (`adapters/`): In-memory backends and clocks
//!
//! ## Invariants
//!
//! - Only the lock holder writes a recomputed value to the cache.
//! - Lock failures degrade to "compute without caching", never to an error.
//! - Every remote call is bounded by `ResolverConfig::call_timeout`.
//!
//! ## Usage Example
//!
//! ```ignore
//! use rp_01_state_resolver::{
//!     InMemoryCacheStore, InMemoryHistoryStore, InMemoryLockManager, InMemoryMempool,
//!     ResolverBackends, ResolverConfig, StateResolverApi, StateResolverService,
//! };
//! use std::sync::Arc;
//!
//! let backends = ResolverBackends {
//!     history: Arc::new(InMemoryHistoryStore::new()),
//!     mempool: Arc::new(InMemoryMempool::new()),
//!     cache: Arc::new(InMemoryCacheStore::new()),
//!     lock: Arc::new(InMemoryLockManager::new()),
//! };
//! let service = StateResolverService::new(backends, ResolverConfig::from_env())?;
//! let account = service.resolve_latest_account(42).await?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{
    InMemoryCacheStore, InMemoryHistoryStore, InMemoryLockManager, InMemoryMempool, ManualClock,
    SystemClock,
};
pub use config::ResolverConfig;
pub use domain::{DataKey, LockKey, LockOutcome, NumericDelta};
pub use error::{ComputationError, ConfigError, LockError, ResolverError, Tier};
pub use metrics::{EntryClass, Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{
    CacheStore, Clock, DistributedLock, HistoryReader, MempoolReader, StateResolverApi, Timestamp,
};
pub use service::{AccountStateResolver, AssetStateResolver, ResolverBackends, StateResolverService};
