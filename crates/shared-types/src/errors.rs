//! # Error Types
//!
//! Failures reported by the stores behind the resolver.

use thiserror::Error;

/// A backend failure in the history, mempool or cache tier.
///
/// A missing row is not a `StoreError`; readers report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Connectivity or query failure.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The call did not complete within its deadline.
    #[error("Backend timeout")]
    Timeout,

    /// The backend answered with data that could not be decoded.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
