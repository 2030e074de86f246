use std::time::Duration;

use tracing::{debug, error, warn};

use crate::{DeliveryError, Notifier};

/// Bounded retry with linearly increasing backoff.
///
/// After failed attempt `k` (1-based) the caller waits `k * backoff_step`
/// before the next one. Nothing is awaited after the final attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_millis(1500),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// Sends `text`, retrying on failure according to `policy`.
///
/// Returns the number of attempts used on success, or the last error once the
/// attempts are exhausted. Duplicate delivery is possible if a request succeeded
/// remotely but its response was lost.
pub async fn deliver_with_retry<N>(
    notifier: &N,
    text: &str,
    policy: &RetryPolicy,
) -> Result<u32, DeliveryError>
where
    N: Notifier + ?Sized,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        debug!(attempt, max_attempts, "sending notification");
        match notifier.send(text).await {
            Ok(()) => return Ok(attempt),
            Err(e) if attempt >= max_attempts => {
                error!(attempt, error = %e, "notification failed, giving up");
                return Err(e);
            }
            Err(e) => {
                let delay = policy.backoff_after(attempt);
                warn!(attempt, error = %e, delay_ms = delay.as_millis() as u64, "notification attempt failed");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;

    /// Fails the first `failures` calls, then succeeds.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Notifier for Flaky {
        async fn send(&self, _text: &str) -> Result<(), DeliveryError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.failures {
                Err(DeliveryError::Unavailable(format!("call {n}")))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures_with_linear_backoff() {
        let notifier = Flaky::new(2);
        let started = Instant::now();

        let attempts = deliver_with_retry(&notifier, "hi", &RetryPolicy::default())
            .await
            .unwrap();

        assert_eq!(attempts, 3);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 3);
        // 1.5s after the first failure + 3.0s after the second
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(4500) && waited < Duration::from_millis(4600), "{waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts_without_trailing_sleep() {
        let notifier = Flaky::new(u32::MAX);
        let started = Instant::now();

        let err = deliver_with_retry(&notifier, "hi", &RetryPolicy::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::Unavailable(ref m) if m == "call 3"));
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 3);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(4500) && waited < Duration::from_millis(4600), "{waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let notifier = Flaky::new(0);
        let policy = RetryPolicy {
            max_attempts: 0,
            backoff_step: Duration::from_secs(1),
        };
        assert_eq!(deliver_with_retry(&notifier, "hi", &policy).await.unwrap(), 1);
    }

    #[test]
    fn backoff_grows_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_after(1), Duration::from_millis(1500));
        assert_eq!(policy.backoff_after(2), Duration::from_millis(3000));
        assert_eq!(policy.backoff_after(3), Duration::from_millis(4500));
    }
}
