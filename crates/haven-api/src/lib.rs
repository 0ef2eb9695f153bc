//! Async HTTP client for the haven control hub.
//!
//! The hub owns all authoritative state — sensor readings, device power
//! state, logs, and temperature forecasts. This crate is the transport
//! boundary: typed wire models, request helpers, and the error taxonomy.
//! Business rules (clamping, optimistic writes, reconciliation) live in
//! `haven-core`; nothing here mutates local state.
//!
//! Endpoint modules are implemented as inherent methods on [`HubClient`]
//! in separate files to keep `client.rs` focused on transport mechanics.

pub mod error;
pub mod models;
pub mod transport;

mod auth;
mod client;
mod devices;
mod logs;
mod readings;
mod schedule;

pub use client::HubClient;
pub use error::Error;
pub use models::{
    ForecastPayload, LightsState, ScheduleRequest, SensorReadings, SystemLogEntry, User,
    VoiceLogEntry, WireAirQuality,
};
pub use transport::TransportConfig;

/// Number of points in a forecast series (+1h through +5h).
pub const FORECAST_POINTS: usize = 5;
