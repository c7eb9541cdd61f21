//! # gatehouse-core
//!
//! Core library for the Gatehouse management API client providing:
//! - Rate-limit-aware retry execution with exponential backoff and jitter
//! - Response status types shared with resource clients
//! - Per-invocation retry configuration

pub mod retry;
pub mod types;

pub use retry::{retry_with_config, RetryExecutor, RetryExecutorBuilder};
pub use types::{ResponseDescriptor, ResponseStatus, RetryConfig};
