//! Domain Layer - Pure resolution logic
//!
//! This layer contains:
//! - Cache and lock key derivation
//! - Decimal balance arithmetic
//! - The tagged lock outcome
//! - The finalized balance fallback chain
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod keys;
pub mod lock;
pub mod numeric;
pub mod sources;

pub use keys::{CacheEntity, DataKey, LockKey};
pub use lock::LockOutcome;
pub use numeric::NumericDelta;
pub use sources::{BalanceSource, FINALIZED_BALANCE_CHAIN};
