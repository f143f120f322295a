//! Retry of transient provider failures.

use herald_error::{GenerationError, GenerationErrorKind};
use std::future::Future;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::warn;

/// Backoff parameters for provider requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: usize,
    /// Initial backoff in milliseconds
    pub initial_backoff_ms: u64,
    /// Upper bound on a single backoff
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 500,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Run `operation`, retrying while it fails with a retryable kind.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, GenerationError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GenerationError>>,
    {
        let strategy = ExponentialBackoff::from_millis(self.initial_backoff_ms)
            .factor(2)
            .max_delay(self.max_delay)
            .map(jitter)
            .take(self.max_retries);

        Retry::spawn(strategy, || {
            let attempt = operation();
            async move {
                match attempt.await {
                    Ok(value) => Ok(value),
                    Err(e) if e.kind.is_retryable() => {
                        warn!(error = %e, "Provider request failed, will retry");
                        let retry_after = matches!(e.kind, GenerationErrorKind::RateLimited)
                            .then(|| Duration::from_secs(5));
                        Err(RetryError::Transient {
                            err: e,
                            retry_after,
                        })
                    }
                    Err(e) => Err(RetryError::Permanent(e)),
                }
            }
        })
        .await
    }
}

/// Map a non-success HTTP status to a generation error kind.
pub(crate) fn status_error(status: u16, body: String) -> GenerationErrorKind {
    if status == 429 {
        GenerationErrorKind::RateLimited
    } else {
        GenerationErrorKind::Api {
            status,
            message: body,
        }
    }
}
