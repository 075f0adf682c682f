use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;

use crate::error::{AppError, AppResult};

/// Bounded exponential backoff applied at every external call site.
///
/// The delay before retry `n` (0-based) is `multiplier * 2^n`, clamped to
/// `[min_delay, max_delay]`. Only errors for which [`AppError::is_retryable`]
/// holds are repeated; anything else is returned on the first attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: usize,
    multiplier: Duration,
    min_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: usize,
        multiplier: Duration,
        min_delay: Duration,
        max_delay: Duration,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            multiplier,
            min_delay,
            max_delay: max_delay.max(min_delay),
        }
    }

    /// Retries immediately; used by tests and local tooling.
    pub fn immediate(max_attempts: usize) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    /// Total attempts, including the first one
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// The sleep schedule between attempts (one entry fewer than attempts)
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let policy = self.clone();
        (0..self.max_attempts - 1).map(move |retry| policy.delay_for(retry))
    }

    fn delay_for(&self, retry: usize) -> Duration {
        let factor = 2u32.saturating_pow(retry as u32);
        self.multiplier
            .saturating_mul(factor)
            .clamp(self.min_delay, self.max_delay)
    }

    /// Runs `action` until it succeeds, fails permanently, or the attempts run out.
    ///
    /// `operation` names the call in logs (e.g. `"catalog.lookup"`).
    pub async fn run<T, F, Fut>(&self, operation: &str, mut action: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let max_attempts = self.max_attempts;
        let mut attempt = 0usize;

        RetryIf::spawn(
            self.delays(),
            || {
                attempt += 1;
                let current = attempt;
                let fut = action();
                async move {
                    fut.await.map_err(|e| {
                        let retryable = e.is_retryable();
                        if retryable && current < max_attempts {
                            tracing::warn!(
                                operation = %operation,
                                attempt = current,
                                max_attempts = max_attempts,
                                error = %e,
                                "Transient failure, retrying"
                            );
                        } else {
                            tracing::error!(
                                operation = %operation,
                                attempt = current,
                                retryable = retryable,
                                error = %e,
                                "Giving up"
                            );
                        }
                        e
                    })
                }
            },
            |e: &AppError| e.is_retryable(),
        )
        .await
    }
}
