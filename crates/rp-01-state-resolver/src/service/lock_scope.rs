//! Scoped recomputation lock
//!
//! A `LockHandle` lives for exactly one resolution attempt. The resolvers
//! call [`LockHandle::release`] on every exit path; if the handle is dropped
//! while still held (the resolution future was cancelled), release is handed
//! to the runtime so the lock does not linger until its TTL.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::deadline::lock_call;
use crate::domain::{LockKey, LockOutcome};
use crate::ports::DistributedLock;

pub struct LockHandle {
    backend: Arc<dyn DistributedLock>,
    key: LockKey,
    owner: String,
    outcome: LockOutcome,
    call_timeout: Duration,
    released: bool,
}

impl LockHandle {
    /// Makes one non-blocking acquisition attempt.
    pub async fn acquire(
        backend: Arc<dyn DistributedLock>,
        key: LockKey,
        ttl: Duration,
        call_timeout: Duration,
    ) -> Self {
        let owner = Uuid::new_v4().to_string();
        let attempt = lock_call(call_timeout, backend.try_acquire(&key, &owner, ttl)).await;
        let outcome = LockOutcome::from_attempt(attempt);

        match &outcome {
            LockOutcome::Held => debug!(lock_key = %key, "Recomputation lock acquired"),
            LockOutcome::Denied => debug!(
                lock_key = %key,
                "Recomputation lock held elsewhere, cache will not be written"
            ),
            LockOutcome::Failed(err) => warn!(
                lock_key = %key,
                error = %err,
                "Lock acquisition failed, cache will not be written"
            ),
        }

        Self {
            backend,
            key,
            owner,
            outcome,
            call_timeout,
            released: false,
        }
    }

    pub fn outcome(&self) -> &LockOutcome {
        &self.outcome
    }

    /// True while this handle owns the lock.
    pub fn is_held(&self) -> bool {
        self.outcome.is_held() && !self.released
    }

    pub fn key(&self) -> &LockKey {
        &self.key
    }

    /// Releases the lock if this handle holds it.
    ///
    /// Idempotent. Backend failures are logged and swallowed; the lock TTL
    /// bounds how long a failed release can linger.
    pub async fn release(&mut self) {
        if !self.is_held() {
            return;
        }
        self.released = true;

        match lock_call(
            self.call_timeout,
            self.backend.release(&self.key, &self.owner),
        )
        .await
        {
            Ok(true) => debug!(lock_key = %self.key, "Recomputation lock released"),
            Ok(false) => warn!(
                lock_key = %self.key,
                "Recomputation lock expired before release"
            ),
            Err(err) => warn!(
                lock_key = %self.key,
                error = %err,
                "Failed to release recomputation lock"
            ),
        }
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        if !self.is_held() {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                lock_key = %self.key,
                "Lock handle dropped outside a runtime, leaving lock to expire"
            );
            return;
        };

        let backend = Arc::clone(&self.backend);
        let key = self.key.clone();
        let owner = std::mem::take(&mut self.owner);
        let call_timeout = self.call_timeout;
        runtime.spawn(async move {
            if let Err(err) = lock_call(call_timeout, backend.release(&key, &owner)).await {
                warn!(lock_key = %key, error = %err, "Deferred lock release failed");
            }
        });
    }
}
