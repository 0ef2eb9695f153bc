//! Session store, device mirror, and synchronization loop for haven.
//!
//! This crate owns the client-side state model for a haven control hub:
//!
//! - **[`HomeHub`]** — central facade. [`connect()`](HomeHub::connect)
//!   authenticates and spawns one background poll task per resource
//!   kind; device writes go through an optimistic apply-then-confirm
//!   path with exact rollback on rejection.
//!
//! - **[`Mirror`]** — reactive local copy of the hub's state, one
//!   `watch` channel per slice. Reads are synchronous snapshots; stale
//!   data stays renderable when the hub is unreachable.
//!
//! - **[`SessionStore`]** — the one source of truth for "logged in".
//!   Any 401/403 observed by a poll or write drops the session and
//!   raises a single notice.
//!
//! - **Domain model** ([`model`]) — canonical types the presentation
//!   layer renders; wire shapes never escape the store boundary.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{HubConfig, PollIntervals};
pub use controller::{HomeHub, Notice, NoticeLevel};
pub use error::CoreError;
pub use session::SessionStore;
pub use store::Mirror;
pub use sync::ResourceKind;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AirQuality, Device, DeviceId, DeviceKind, FanSpeed, ForecastSeries, HouseDevices, Role,
    SensorSnapshot, Session, SystemLogEntry, UserProfile, VoiceExchange, clamp_target_temp,
};
