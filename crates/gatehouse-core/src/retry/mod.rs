//! Rate-limit-aware retry execution
//!
//! This module provides the request execution policy shared by all resource
//! clients: an action performing one HTTP call is re-invoked while the server
//! answers 429, with an exponentially growing, jittered, clamped delay
//! between attempts, up to a bounded retry budget.
//!
//! # Features
//!
//! - Exponential backoff with bounded random jitter and a clamped delay window
//! - Retry budget resolved from caller config, capped by a hard ceiling
//! - Action failures propagate untouched; only 429 responses trigger a retry
//! - Sleep and randomness injected via the `Sleeper` and `JitterSource`
//!   traits so tests run without waiting
//! - Observable execution via the `RetryObserver` trait, with a built-in
//!   `TracingObserver` for logging
//!
//! # Example
//!
//! ```rust,no_run
//! use gatehouse_core::retry::retry_with_config;
//! use gatehouse_core::types::{ResponseDescriptor, RetryConfig};
//!
//! async fn example() -> Result<ResponseDescriptor, std::io::Error> {
//!     let config = RetryConfig::default();
//!
//!     retry_with_config(&config, || async {
//!         // One HTTP call; the executor re-invokes this while the server
//!         // answers 429.
//!         Ok(ResponseDescriptor::new(200))
//!     })
//!     .await
//! }
//! ```

mod backoff;
mod executor;
mod observer;

pub use backoff::{
    clamp_delay, jitter_window, retry_delay, JitterSource, Sleeper, ThreadRngJitter, TokioSleeper,
    BASE_DELAY_MS, DEFAULT_MAX_RETRIES, JITTER_WINDOW_MS, MAX_DELAY_MS, MAX_RETRIES_CAP,
    MIN_DELAY_MS,
};
pub use executor::{retry_with_config, RetryExecutor, RetryExecutorBuilder};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
