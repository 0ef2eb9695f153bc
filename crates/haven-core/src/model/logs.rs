// ── Log model ──

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One system log line. Timestamps arrive as fractional unix seconds and
/// are promoted to UTC datetimes here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemLogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl From<haven_api::SystemLogEntry> for SystemLogEntry {
    fn from(wire: haven_api::SystemLogEntry) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let millis = (wire.timestamp * 1000.0) as i64;
        Self {
            timestamp: DateTime::from_timestamp_millis(millis).unwrap_or_default(),
            message: wire.message,
        }
    }
}

/// One voice-assistant exchange: what the user said, what came back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceExchange {
    pub user: String,
    pub assistant: String,
}

impl From<haven_api::VoiceLogEntry> for VoiceExchange {
    fn from(wire: haven_api::VoiceLogEntry) -> Self {
        Self {
            user: wire.user,
            assistant: wire.assistant,
        }
    }
}
