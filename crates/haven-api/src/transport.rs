// Shared transport configuration for building reqwest::Client instances.
//
// A single place for the timeout policy: every request carries an explicit
// timeout so a hung hub bounds staleness instead of stalling a poll task
// indefinitely.

use std::time::Duration;

/// Per-request timeout applied when the caller doesn't override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("haven/0.1.0")
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
