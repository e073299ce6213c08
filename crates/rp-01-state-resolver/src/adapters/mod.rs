//! Adapters Layer
//!
//! In-memory implementations of every outbound port. They stand in for the
//! remote cache, lock, history and mempool backends in tests and in
//! single-process deployments.

pub mod clock;
pub mod memory_cache;
pub mod memory_history;
pub mod memory_lock;
pub mod memory_mempool;

pub use clock::{ManualClock, SystemClock};
pub use memory_cache::InMemoryCacheStore;
pub use memory_history::InMemoryHistoryStore;
pub use memory_lock::InMemoryLockManager;
pub use memory_mempool::InMemoryMempool;
