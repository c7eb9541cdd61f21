//! Shared request/response types for the Gatehouse client
//!
//! These types sit on the boundary between resource clients and the retry
//! execution core: the retry configuration a caller hands in per request,
//! and the response descriptor the core inspects for rate limiting.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::retry::{DEFAULT_MAX_RETRIES, MAX_RETRIES_CAP};

/// HTTP status code signalling the caller exceeded its allowed request rate.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Per-invocation retry configuration.
///
/// Only the retry budget is caller-tunable; the backoff timing policy is
/// fixed (see the constants in [`crate::retry`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Upper bound on additional attempts after the first. Values above the
    /// hard cap are clamped; `None` selects the default budget.
    #[serde(default)]
    pub max_retries: Option<u32>,
}

impl RetryConfig {
    /// Create a config with an explicit retry budget.
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries: Some(max_retries),
        }
    }

    /// Resolve the effective retry budget: the caller's value (or the
    /// default) clamped to the hard cap.
    pub fn effective_max_retries(&self) -> u32 {
        self.max_retries
            .unwrap_or(DEFAULT_MAX_RETRIES)
            .min(MAX_RETRIES_CAP)
    }
}

/// A response as seen by the retry core.
///
/// Retry decisions key only on the numeric status code; anything else a
/// response carries belongs to the resource client that issued the call.
pub trait ResponseStatus {
    /// The HTTP status code of this response.
    fn status_code(&self) -> u16;

    /// Whether the server reported rate limiting.
    fn is_rate_limited(&self) -> bool {
        self.status_code() == TOO_MANY_REQUESTS
    }
}

/// Minimal response value produced by an action: status code, headers, body.
///
/// Resource clients with richer response types implement [`ResponseStatus`]
/// directly instead of converting into this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResponseDescriptor {
    /// HTTP status code of the completed call.
    pub status_code: u16,

    /// Response headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Raw response body, if any.
    #[serde(default)]
    pub body: Option<String>,
}

impl ResponseDescriptor {
    /// Create a descriptor with the given status code and no headers or body.
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    /// Attach a body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

impl ResponseStatus for ResponseDescriptor {
    fn status_code(&self) -> u16 {
        self.status_code
    }
}
