//! Configuration for the sync engine.

use std::time::Duration;

/// Prefix inserted between the base URL and the task fragment for pulls.
const DEFAULT_REQUEST_PREFIX: &str = "api?task=";

/// Configuration for a sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the remote service.
    pub base_url: String,
    /// Request prefix for pull URLs.
    pub request_prefix: String,
    /// Request timeout applied to every HTTP call.
    ///
    /// The engine never issues an unbounded network call; a stalled
    /// server surfaces as a per-call network error after this duration.
    pub timeout: Duration,
}

impl SyncConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_prefix: DEFAULT_REQUEST_PREFIX.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the request prefix.
    pub fn with_request_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.request_prefix = prefix.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
