//! Ledger call timeout helpers
//!
//! Every gateway call is bounded. An elapsed bound is a failure, never a
//! success.

use super::errors::{LedgerError, LedgerResult};
use std::time::Duration;
use tokio::time::timeout;

/// Execute a ledger call with timeout
///
/// # Arguments
///
/// * `duration` - Timeout duration
/// * `future` - Gateway call to execute
///
/// # Returns
///
/// * `LedgerResult<T>` - Call result or `LedgerError::Timeout`
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> LedgerResult<T>
where
    F: std::future::Future<Output = LedgerResult<T>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(LedgerError::Timeout(duration)),
    }
}
