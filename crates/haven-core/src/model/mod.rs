//! Canonical domain types.
//!
//! Wire shapes from `haven-api` convert into these at the store boundary;
//! nothing above the store ever sees raw payloads.

pub mod device;
pub mod logs;
pub mod readings;
pub mod session;

pub use device::{Device, DeviceId, DeviceKind, FanSpeed, HouseDevices, clamp_target_temp};
pub use logs::{SystemLogEntry, VoiceExchange};
pub use readings::{AirQuality, ForecastSeries, SensorSnapshot};
pub use session::{Role, Session, UserProfile};
