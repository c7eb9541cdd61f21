//! Retry observation and logging
//!
//! `RetryObserver` exposes the retry loop's transitions for logging and
//! metrics collection. `TracingObserver` logs through the `tracing` crate;
//! `StatsObserver` counts events for tests. Observers never alter control
//! flow.

use std::time::Duration;

use crate::types::TOO_MANY_REQUESTS;

/// Observer trait for retry execution events.
///
/// # Example
///
/// ```rust
/// use gatehouse_core::retry::RetryObserver;
/// use std::time::Duration;
///
/// struct MetricsObserver;
///
/// impl RetryObserver for MetricsObserver {
///     fn on_attempt_start(&self, _attempt: u32, _max_retries: u32) {}
///     fn on_rate_limited(&self, _retry: u32, _max_retries: u32, _delay: Duration) {}
///     fn on_resolved(&self, _status_code: u16, _attempts: u32, _elapsed: Duration) {}
/// }
/// ```
pub trait RetryObserver: Send + Sync {
    /// Called before each invocation of the action.
    ///
    /// `attempt` counts invocations and is 1-indexed.
    fn on_attempt_start(&self, attempt: u32, max_retries: u32);

    /// Called when a rate-limited response schedules a retry.
    ///
    /// `retry` is the 1-indexed retry that will run after `delay`.
    fn on_rate_limited(&self, retry: u32, max_retries: u32, delay: Duration);

    /// Called when the executor returns a response to the caller.
    ///
    /// Fires for every outcome except an action failure, including a final
    /// response that is still rate limited.
    fn on_resolved(&self, status_code: u16, attempts: u32, elapsed: Duration);
}

/// A no-op observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RetryObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_retries: u32) {}

    fn on_rate_limited(&self, _retry: u32, _max_retries: u32, _delay: Duration) {}

    fn on_resolved(&self, _status_code: u16, _attempts: u32, _elapsed: Duration) {}
}

/// An observer that logs retry events using the `tracing` crate.
///
/// # Log Levels
///
/// - `on_attempt_start`: DEBUG
/// - `on_rate_limited`: WARN
/// - `on_resolved`: WARN if the final response is still 429, INFO after a
///   successful retry, DEBUG on first-attempt resolution
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the operation being executed (for log context)
    operation: String,
}

impl TracingObserver {
    /// Create a new tracing observer for the named operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    /// Get the operation name.
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("request")
    }
}

impl RetryObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_retries: u32) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            max_retries = max_retries,
            "starting attempt"
        );
    }

    fn on_rate_limited(&self, retry: u32, max_retries: u32, delay: Duration) {
        tracing::warn!(
            operation = %self.operation,
            retry = retry,
            max_retries = max_retries,
            delay_ms = delay.as_millis() as u64,
            "rate limited, backing off"
        );
    }

    fn on_resolved(&self, status_code: u16, attempts: u32, elapsed: Duration) {
        if status_code == TOO_MANY_REQUESTS {
            tracing::warn!(
                operation = %self.operation,
                attempts = attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "still rate limited, retry budget spent"
            );
        } else if attempts > 1 {
            tracing::info!(
                operation = %self.operation,
                status_code = status_code,
                attempts = attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "resolved after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                status_code = status_code,
                elapsed_ms = elapsed.as_millis() as u64,
                "resolved on first attempt"
            );
        }
    }
}

/// An observer that collects counters about retry execution.
///
/// Useful for testing and metrics collection.
#[derive(Debug, Default)]
pub struct StatsObserver {
    /// Attempt start events
    pub attempt_starts: std::sync::atomic::AtomicU32,
    /// Scheduled rate-limit waits
    pub rate_limits: std::sync::atomic::AtomicU32,
    /// Resolution events
    pub resolutions: std::sync::atomic::AtomicU32,
}

impl StatsObserver {
    /// Create a new stats observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of attempt starts.
    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts
            .load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Get the number of scheduled rate-limit waits.
    pub fn rate_limits(&self) -> u32 {
        self.rate_limits.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Get the number of resolutions.
    pub fn resolutions(&self) -> u32 {
        self.resolutions.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl RetryObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_retries: u32) {
        self.attempt_starts
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn on_rate_limited(&self, _retry: u32, _max_retries: u32, _delay: Duration) {
        self.rate_limits
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn on_resolved(&self, _status_code: u16, _attempts: u32, _elapsed: Duration) {
        self.resolutions
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

/// Implement RetryObserver for Arc<T> where T: RetryObserver
impl<T: RetryObserver + ?Sized> RetryObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32, max_retries: u32) {
        (**self).on_attempt_start(attempt, max_retries)
    }

    fn on_rate_limited(&self, retry: u32, max_retries: u32, delay: Duration) {
        (**self).on_rate_limited(retry, max_retries, delay)
    }

    fn on_resolved(&self, status_code: u16, attempts: u32, elapsed: Duration) {
        (**self).on_resolved(status_code, attempts, elapsed)
    }
}

/// Implement RetryObserver for Box<T> where T: RetryObserver
impl<T: RetryObserver + ?Sized> RetryObserver for Box<T> {
    fn on_attempt_start(&self, attempt: u32, max_retries: u32) {
        (**self).on_attempt_start(attempt, max_retries)
    }

    fn on_rate_limited(&self, retry: u32, max_retries: u32, delay: Duration) {
        (**self).on_rate_limited(retry, max_retries, delay)
    }

    fn on_resolved(&self, status_code: u16, attempts: u32, elapsed: Duration) {
        (**self).on_resolved(status_code, attempts, elapsed)
    }
}
