//! Resolver configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use rp_01_state_resolver::ResolverConfig;
//! use std::time::Duration;
//!
//! let config = ResolverConfig::default()
//!     .with_balance_expiry(Duration::from_secs(60))
//!     .with_lock_expiry(Duration::from_secs(15));
//! config.validate()?;
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::domain::NumericDelta;
use crate::error::ConfigError;

/// Default TTL of nonce and balance cache entries.
pub const DEFAULT_BALANCE_EXPIRY: Duration = Duration::from_secs(30);

/// Default TTL of a recomputation lock.
pub const DEFAULT_LOCK_EXPIRY: Duration = Duration::from_secs(10);

/// Default deadline of a single remote call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(3);

/// Remote calls budgeted to one recomputation while it holds the lock.
pub const LOCK_CALL_BUDGET: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// TTL of nonce and balance cache entries.
    pub balance_expiry: Duration,
    /// TTL of the recomputation lock. Bounds how long a crashed holder can
    /// keep others from repopulating.
    ///
    /// Must exceed `LOCK_CALL_BUDGET × call_timeout`. A holder whose calls
    /// run past the TTL still writes its value, racing whoever took the lock
    /// next.
    pub lock_expiry: Duration,
    /// Deadline applied to every cache, lock, history and mempool call.
    pub call_timeout: Duration,
    /// Extend a nonce entry's TTL when it is served. Balance entries are
    /// never touched.
    pub touch_nonce_on_hit: bool,
    /// Let a pending debit drive a balance below zero instead of failing.
    pub allow_negative_balance: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            balance_expiry: DEFAULT_BALANCE_EXPIRY,
            lock_expiry: DEFAULT_LOCK_EXPIRY,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            touch_nonce_on_hit: true,
            allow_negative_balance: false,
        }
    }
}

impl ResolverConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RP_BALANCE_EXPIRY_SECS`: cache entry TTL (default: 30)
    /// - `RP_LOCK_EXPIRY_SECS`: lock TTL (default: 10)
    /// - `RP_CALL_TIMEOUT_MS`: remote call deadline (default: 3000)
    /// - `RP_TOUCH_NONCE_ON_HIT`: refresh nonce TTL on hit (default: true)
    /// - `RP_ALLOW_NEGATIVE_BALANCE`: accept negative balances (default: false)
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            balance_expiry: env::var("RP_BALANCE_EXPIRY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.balance_expiry),

            lock_expiry: env::var("RP_LOCK_EXPIRY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.lock_expiry),

            call_timeout: env::var("RP_CALL_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.call_timeout),

            touch_nonce_on_hit: env::var("RP_TOUCH_NONCE_ON_HIT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.touch_nonce_on_hit),

            allow_negative_balance: env::var("RP_ALLOW_NEGATIVE_BALANCE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.allow_negative_balance),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.balance_expiry.is_zero() {
            return Err(ConfigError::Invalid(
                "balance_expiry cannot be 0".to_string(),
            ));
        }

        if self.lock_expiry.is_zero() {
            return Err(ConfigError::Invalid("lock_expiry cannot be 0".to_string()));
        }

        if self.call_timeout.is_zero() {
            return Err(ConfigError::Invalid("call_timeout cannot be 0".to_string()));
        }

        let budget = self.call_timeout.checked_mul(LOCK_CALL_BUDGET);
        if budget.map_or(true, |budget| self.lock_expiry <= budget) {
            return Err(ConfigError::Invalid(format!(
                "lock_expiry ({:?}) must exceed {} x call_timeout ({:?})",
                self.lock_expiry, LOCK_CALL_BUDGET, self.call_timeout
            )));
        }

        Ok(())
    }

    /// Balance arithmetic matching `allow_negative_balance`.
    pub fn numeric_delta(&self) -> NumericDelta {
        if self.allow_negative_balance {
            NumericDelta::allowing_negative()
        } else {
            NumericDelta::new()
        }
    }

    pub fn with_balance_expiry(mut self, ttl: Duration) -> Self {
        self.balance_expiry = ttl;
        self
    }

    pub fn with_lock_expiry(mut self, ttl: Duration) -> Self {
        self.lock_expiry = ttl;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_touch_nonce_on_hit(mut self, enabled: bool) -> Self {
        self.touch_nonce_on_hit = enabled;
        self
    }

    pub fn with_allow_negative_balance(mut self, allowed: bool) -> Self {
        self.allow_negative_balance = allowed;
        self
    }
}
