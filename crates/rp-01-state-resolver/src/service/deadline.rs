//! Deadlines for remote calls
//!
//! A call that outlives its deadline is reported as a timeout and is not
//! retried here.

use shared_types::StoreError;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::error::LockError;

pub(crate) async fn store_call<T, F>(deadline: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    timeout(deadline, call)
        .await
        .unwrap_or_else(|_| Err(StoreError::Timeout))
}

pub(crate) async fn lock_call<T, F>(deadline: Duration, call: F) -> Result<T, LockError>
where
    F: Future<Output = Result<T, LockError>>,
{
    timeout(deadline, call)
        .await
        .unwrap_or_else(|_| Err(LockError::Timeout))
}
