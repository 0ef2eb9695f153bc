// ── Hub connection configuration ──

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::sync::ResourceKind;

/// Everything needed to open a connection to a hub.
///
/// Built by `haven-config` from profile + environment, or directly in
/// tests. The base URL is always explicit — nothing in this workspace
/// hard-codes a hub address.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Hub root, e.g. `http://192.168.8.191:8000`.
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    /// Per-request timeout. A hung hub must never wedge the poll loop.
    pub timeout: Duration,
    pub intervals: PollIntervals,
}

impl HubConfig {
    /// Config with default timeout and intervals.
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            timeout: haven_api::transport::DEFAULT_TIMEOUT,
            intervals: PollIntervals::default(),
        }
    }
}

/// Poll cadence per resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub sensors: Duration,
    pub devices: Duration,
    pub system_logs: Duration,
    pub voice_logs: Duration,
    pub forecast: Duration,
}

impl PollIntervals {
    /// The interval for one resource kind.
    pub fn for_kind(&self, kind: ResourceKind) -> Duration {
        match kind {
            ResourceKind::Sensors => self.sensors,
            ResourceKind::Devices => self.devices,
            ResourceKind::SystemLogs => self.system_logs,
            ResourceKind::VoiceLogs => self.voice_logs,
            ResourceKind::Forecast => self.forecast,
        }
    }

    /// Uniform interval for every kind (handy for tests and `watch`).
    pub fn uniform(period: Duration) -> Self {
        Self {
            sensors: period,
            devices: period,
            system_logs: period,
            voice_logs: period,
            forecast: period,
        }
    }
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            sensors: Duration::from_secs(5),
            devices: Duration::from_secs(3),
            system_logs: Duration::from_secs(3),
            voice_logs: Duration::from_secs(3),
            forecast: Duration::from_secs(10),
        }
    }
}
