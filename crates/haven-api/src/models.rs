// Wire models for the hub's JSON payloads.
//
// These mirror the hub's shapes exactly; `haven-core` converts them into
// domain types. Field names follow the hub (snake_case throughout).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user returned by `POST /login`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// `"admin"` or `"guest"`.
    pub role: String,
}

/// Snapshot returned by `GET /sensors`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SensorReadings {
    pub temperature: f64,
    pub humidity: f64,
    pub air_quality: WireAirQuality,
}

/// Air quality arrives as either a numeric index or a label string
/// depending on which sensor backend the hub is running.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum WireAirQuality {
    Index(f64),
    Label(String),
}

/// Combined device state returned by `GET /lights`.
///
/// The hub reports all three rooms plus the AC setpoint and fan level in
/// one payload; there is no per-device read endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LightsState {
    /// `"on"` / `"off"`.
    pub kitchen: String,
    pub livingroom: String,
    pub bedroom: String,
    pub ac_temp: i64,
    pub fan_speed: i64,
}

/// One entry from `GET /logs`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SystemLogEntry {
    /// Unix timestamp in seconds (fractional).
    pub timestamp: f64,
    pub message: String,
}

/// One exchange from `GET /voicelogs`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VoiceLogEntry {
    pub user: String,
    pub assistant: String,
}

/// Payload of `GET /temperature_prediction`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastPayload {
    pub temperature_prediction: Vec<f64>,
}

/// Body of `POST /schedule`. Timestamps serialize as ISO-8601.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub ac_temp: i32,
    pub fan_speed: u8,
}
