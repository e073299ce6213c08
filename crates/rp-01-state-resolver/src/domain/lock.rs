//! Outcome of a single, non-blocking lock acquisition attempt

use crate::error::LockError;

/// Tagged result of trying to take the recomputation lock.
///
/// `Denied` and `Failed` steer control flow the same way (no cache write);
/// they differ only in what gets logged and counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockOutcome {
    /// This resolution owns the lock and may repopulate the cache.
    Held,
    /// Another process holds the lock and is recomputing the same value.
    Denied,
    /// The lock backend failed.
    Failed(LockError),
}

impl LockOutcome {
    pub fn from_attempt(attempt: Result<bool, LockError>) -> Self {
        match attempt {
            Ok(true) => Self::Held,
            Ok(false) => Self::Denied,
            Err(err) => Self::Failed(err),
        }
    }

    pub fn is_held(&self) -> bool {
        matches!(self, Self::Held)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Held => "held",
            Self::Denied => "denied",
            Self::Failed(_) => "failed",
        }
    }
}
