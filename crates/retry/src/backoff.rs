//! The retry loop.

use crate::classify::{Classify, ErrorClass};
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

/// Number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 4;
/// Delay before the first retry; doubled before every subsequent one.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(4000);

/// Pure exponential back-off, no jitter.
///
/// With `retries = n` and `initial_delay = d` an operation that keeps failing
/// transiently is invoked `n + 1` times, and the caller waits
/// `d × (2ⁿ − 1)` in total before the last error is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    retries: u32,
    initial_delay: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(DEFAULT_RETRIES, DEFAULT_INITIAL_DELAY)
    }
}

/// Ephemeral bookkeeping for a single [`Backoff::run`] call.
struct RetryState {
    attempt: u32,
    remaining: u32,
    delay: Duration,
    last_class: Option<ErrorClass>,
}

impl Backoff {
    pub fn new(retries: u32, initial_delay: Duration) -> Self {
        Self { retries, initial_delay }
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// The sleep taken before each retry, in order.
    ///
    /// ```
    /// use std::time::Duration;
    /// use verbum_retry::Backoff;
    ///
    /// let delays: Vec<_> = Backoff::default().delays().collect();
    /// assert_eq!(delays, [4000, 8000, 16000, 32000].map(Duration::from_millis));
    /// ```
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        std::iter::successors(Some(self.initial_delay), |delay| Some(delay.saturating_mul(2)))
            .take(self.retries as usize)
    }

    /// Total time spent sleeping when every attempt fails transiently.
    pub fn worst_case_wait(&self) -> Duration {
        self.delays().fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Run `operation` until it succeeds, fails with an error that is not
    /// [retryable](ErrorClass::is_retryable), or runs out of retries.
    ///
    /// The error returned is always the one produced by the last invocation.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + Debug,
    {
        let mut state = RetryState {
            attempt: 0,
            remaining: self.retries,
            delay: self.initial_delay,
            last_class: None,
        };
        loop {
            state.attempt += 1;
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            let class = err.class();
            state.last_class = Some(class);
            if !class.is_retryable() {
                tracing::error!(attempt = state.attempt, class = %class, error = ?err, "Call failed; not retrying");
                return Err(err);
            }
            if state.remaining == 0 {
                tracing::error!(attempts = state.attempt, error = ?err, "Call still failing after all retries; giving up");
                return Err(err);
            }
            tracing::warn!(
                remaining = state.remaining,
                delay_ms = u64::try_from(state.delay.as_millis()).unwrap_or(u64::MAX),
                "Rate limit or server error; waiting before retrying",
            );
            tokio::time::sleep(state.delay).await;
            state.remaining -= 1;
            state.delay = state.delay.saturating_mul(2);
            tracing::trace!(attempt = state.attempt + 1, last_class = ?state.last_class, "Retrying");
        }
    }
}

/// Run `operation` with the [default](Backoff::default) schedule: 4 retries,
/// starting at 4 seconds.
pub async fn with_retry<T, E, F, Fut>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify + Debug,
{
    Backoff::default().run(operation).await
}
