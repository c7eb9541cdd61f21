//! Retry execution engine
//!
//! This module provides the execution loop that re-invokes an HTTP-calling
//! action while the server answers 429, together with the builder that wires
//! in the sleep, jitter, and observer capabilities.

use std::future::Future;
use std::time::Instant;

use crate::types::{ResponseStatus, RetryConfig};

use super::backoff::{retry_delay, JitterSource, Sleeper, ThreadRngJitter, TokioSleeper};
use super::observer::{NoOpObserver, RetryObserver};

/// Execute an action under the rate-limit retry policy.
///
/// This is a convenience function for the common case, using the production
/// timing and randomness sources. For control over those capabilities or for
/// observation, use `RetryExecutorBuilder`.
///
/// # Arguments
///
/// * `config` - Caller-supplied retry budget; everything else in the policy
///   is fixed
/// * `action` - A closure that returns a future performing one HTTP call
///
/// # Returns
///
/// The response from the last invocation of `action` - whether that attempt
/// succeeded, came back with a non-retryable status, or was still rate
/// limited after the budget was spent. An error from `action` itself
/// propagates immediately.
///
/// # Example
///
/// ```rust,no_run
/// use gatehouse_core::retry::retry_with_config;
/// use gatehouse_core::types::{ResponseDescriptor, RetryConfig};
///
/// async fn example() {
///     let config = RetryConfig::with_max_retries(5);
///
///     let result: Result<ResponseDescriptor, std::io::Error> =
///         retry_with_config(&config, || async {
///             // Perform one HTTP call here
///             Ok(ResponseDescriptor::new(200))
///         })
///         .await;
/// }
/// ```
pub async fn retry_with_config<F, Fut, T, E>(config: &RetryConfig, action: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    T: ResponseStatus,
{
    RetryExecutorBuilder::new()
        .with_config(config.clone())
        .build()
        .execute(action)
        .await
}

/// Builder for configuring a `RetryExecutor`
///
/// # Example
///
/// ```rust
/// use gatehouse_core::retry::{RetryExecutorBuilder, TracingObserver};
/// use gatehouse_core::types::RetryConfig;
///
/// let executor = RetryExecutorBuilder::new()
///     .with_config(RetryConfig::with_max_retries(5))
///     .with_observer(TracingObserver::new("get-user"))
///     .build();
/// ```
pub struct RetryExecutorBuilder<S = TokioSleeper, J = ThreadRngJitter, O = NoOpObserver> {
    config: RetryConfig,
    sleeper: S,
    jitter: J,
    observer: O,
}

impl RetryExecutorBuilder {
    /// Create a new builder with the production capabilities and the default
    /// retry budget.
    pub fn new() -> Self {
        Self {
            config: RetryConfig::default(),
            sleeper: TokioSleeper,
            jitter: ThreadRngJitter,
            observer: NoOpObserver,
        }
    }
}

impl Default for RetryExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, J, O> RetryExecutorBuilder<S, J, O> {
    /// Set the retry configuration.
    pub fn with_config(mut self, config: RetryConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the retry budget directly.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = Some(max_retries);
        self
    }

    /// Set the sleeper used between attempts.
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RetryExecutorBuilder<S2, J, O> {
        RetryExecutorBuilder {
            config: self.config,
            sleeper,
            jitter: self.jitter,
            observer: self.observer,
        }
    }

    /// Set the jitter source used for delay randomization.
    pub fn with_jitter_source<J2>(self, jitter: J2) -> RetryExecutorBuilder<S, J2, O> {
        RetryExecutorBuilder {
            config: self.config,
            sleeper: self.sleeper,
            jitter,
            observer: self.observer,
        }
    }

    /// Set the observer.
    ///
    /// The observer receives callbacks during execution.
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<S, J, O2> {
        RetryExecutorBuilder {
            config: self.config,
            sleeper: self.sleeper,
            jitter: self.jitter,
            observer,
        }
    }

    /// Build the executor, resolving the effective retry budget.
    pub fn build(self) -> RetryExecutor<S, J, O> {
        RetryExecutor {
            max_retries: self.config.effective_max_retries(),
            sleeper: self.sleeper,
            jitter: self.jitter,
            observer: self.observer,
        }
    }
}

/// A retry executor with injected sleep, jitter, and observer capabilities.
///
/// Use `RetryExecutorBuilder` to create an instance. Each `execute` call owns
/// its own attempt counter; an executor can be shared across concurrent
/// invocations.
pub struct RetryExecutor<S = TokioSleeper, J = ThreadRngJitter, O = NoOpObserver> {
    max_retries: u32,
    sleeper: S,
    jitter: J,
    observer: O,
}

impl<S, J, O> RetryExecutor<S, J, O>
where
    S: Sleeper,
    J: JitterSource,
    O: RetryObserver,
{
    /// Effective retry budget after defaulting and clamping.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Execute `action`, retrying rate-limited responses.
    ///
    /// The action runs at least once. After a 429 response with budget left,
    /// the executor waits an exponentially growing, jittered, clamped delay
    /// and re-invokes the action; it must therefore be safe to repeat. Any
    /// other status resolves immediately, and so does a 429 once the budget
    /// is spent - the caller always receives the last response obtained.
    ///
    /// An `Err` from the action is never caught or retried.
    pub async fn execute<F, Fut, T, E>(&self, mut action: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        T: ResponseStatus,
    {
        let start = Instant::now();
        let mut retries = 0u32;

        loop {
            self.observer.on_attempt_start(retries + 1, self.max_retries);

            let response = action().await?;

            // Anything but 429 is final, as is 429 once the budget is spent
            if !response.is_rate_limited() || retries >= self.max_retries {
                self.observer
                    .on_resolved(response.status_code(), retries + 1, start.elapsed());
                return Ok(response);
            }

            retries += 1;
            let delay = retry_delay(retries, &self.jitter);

            self.observer
                .on_rate_limited(retries, self.max_retries, delay);

            // Wait before the next attempt
            self.sleeper.sleep(delay).await;
        }
    }
}
