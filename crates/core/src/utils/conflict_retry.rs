use std::future::Future;

use log::warn;

use crate::constants::MAX_CONFLICT_RETRIES;
use crate::errors::{ErrorKind, Result};

/// Runs a read-compute-write cycle, starting over when the write loses a race.
///
/// `attempt` must re-read the record on every call. Errors other than a
/// concurrent modification are returned immediately, and the last conflict
/// is returned once `MAX_CONFLICT_RETRIES` attempts have failed.
pub async fn retry_on_conflict<T, F, Fut>(operation: &str, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut tries = 1;
    loop {
        match attempt().await {
            Err(e) if e.kind() == ErrorKind::Concurrency && tries < MAX_CONFLICT_RETRIES => {
                warn!("{} conflicted (attempt {}), retrying: {}", operation, tries, e);
                tries += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installments::InstallmentError;
    use crate::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn conflict() -> Error {
        InstallmentError::ConcurrentModification("plan-1".to_string()).into()
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicUsize::new(0);
        let result = retry_on_conflict("pay", || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(conflict())
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = retry_on_conflict("pay", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(conflict())
        })
        .await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Concurrency);
        assert_eq!(calls.load(Ordering::SeqCst), MAX_CONFLICT_RETRIES);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = retry_on_conflict("pay", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(InstallmentError::PlanCancelled.into())
        })
        .await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::StateConflict);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
