//! Backoff policy and timing capabilities
//!
//! Delay computation for rate-limited requests: an exponential base, a
//! bounded random jitter window, and a clamp on the final delay. The sleep
//! and randomness primitives are traits so tests can substitute
//! deterministic fakes.

use std::future::Future;
use std::ops::Range;
use std::time::Duration;

use rand::Rng;

/// Retry budget applied when the caller does not supply one.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Hard ceiling on the retry budget; caller values above this are clamped.
pub const MAX_RETRIES_CAP: u32 = 10;

/// Base delay for the first retry, doubled for each retry after it.
pub const BASE_DELAY_MS: u64 = 250;

/// Width of the random jitter window laid on top of the base delay.
pub const JITTER_WINDOW_MS: u64 = 250;

/// Lower clamp on any single inter-attempt delay.
pub const MIN_DELAY_MS: u64 = 250;

/// Upper clamp on any single inter-attempt delay.
pub const MAX_DELAY_MS: u64 = 1000;

/// Compute the jitter sampling window for a retry.
///
/// `retry` is 1-indexed: the first retry has a base delay of
/// [`BASE_DELAY_MS`], doubling on each retry after that. The window spans
/// `[base + 1, base + JITTER_WINDOW_MS)` in milliseconds; the lower bound
/// sits one millisecond above the base.
pub fn jitter_window(retry: u32) -> Range<u64> {
    let exponent = retry.saturating_sub(1);
    let base = (BASE_DELAY_MS as f64 * 2f64.powf(f64::from(exponent))) as u64;
    base.saturating_add(1)..base.saturating_add(JITTER_WINDOW_MS)
}

/// Clamp a jittered delay into the allowed window.
pub fn clamp_delay(delay_ms: u64) -> u64 {
    delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS)
}

/// Compute the delay to wait before the given retry (1-indexed).
///
/// Samples the retry's jitter window through `jitter`, then clamps the
/// result into `[MIN_DELAY_MS, MAX_DELAY_MS]`. From the third retry on the
/// base alone saturates the cap, so the delay is exactly [`MAX_DELAY_MS`].
pub fn retry_delay<J: JitterSource>(retry: u32, jitter: &J) -> Duration {
    Duration::from_millis(clamp_delay(jitter.sample(jitter_window(retry))))
}

/// Source of random jitter for retry delays.
///
/// Jitter only desynchronizes competing clients; it carries no security
/// weight, so the production source is the thread-local PRNG.
pub trait JitterSource: Send + Sync {
    /// Pick a value from `window` (inclusive start, exclusive end), in
    /// milliseconds.
    fn sample(&self, window: Range<u64>) -> u64;
}

/// Jitter source backed by `rand`'s thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn sample(&self, window: Range<u64>) -> u64 {
        rand::rng().random_range(window)
    }
}

/// Timed suspension between attempts.
///
/// Implementations must park only the invoking task, never a thread.
pub trait Sleeper: Send + Sync {
    /// Suspend for `delay`.
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
