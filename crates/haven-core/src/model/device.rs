// ── Device model ──
//
// The hub exposes a fixed set of three controllable devices, one per
// room. Which numeric fields a device carries is determined by its kind
// and enforced at construction.

use serde::Serialize;
use strum::Display;

use haven_api::LightsState;

/// Accepted AC target temperature range (°C).
pub const AC_TEMP_MIN: i32 = 16;
pub const AC_TEMP_MAX: i32 = 32;

/// AC setpoint the hub boots with.
pub const AC_TEMP_DEFAULT: i32 = 24;

/// The fixed device set. Identity is by room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum DeviceId {
    Kitchen,
    LivingRoom,
    Bedroom,
}

impl DeviceId {
    pub const ALL: [Self; 3] = [Self::Kitchen, Self::LivingRoom, Self::Bedroom];

    /// The hub's wire name for this room.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Kitchen => "kitchen",
            Self::LivingRoom => "livingroom",
            Self::Bedroom => "bedroom",
        }
    }

    /// What kind of device lives in this room.
    pub fn kind(self) -> DeviceKind {
        match self {
            Self::Kitchen => DeviceKind::Light,
            Self::LivingRoom => DeviceKind::Ac,
            Self::Bedroom => DeviceKind::Fan,
        }
    }
}

/// Device category, determining which fields are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceKind {
    Light,
    Ac,
    Fan,
}

impl DeviceKind {
    /// User-facing label, as used in failure notices.
    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Ac => "AC",
            Self::Fan => "Fan",
        }
    }
}

/// Discrete fan speed. The hub accepts nothing outside 1–3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FanSpeed {
    Low,
    Medium,
    High,
}

impl FanSpeed {
    /// Clamp an arbitrary level into the accepted set. 0 or less is Low,
    /// 4 or more is High — out-of-range requests are corrected, never
    /// rejected.
    pub fn from_level(level: i64) -> Self {
        match level {
            i64::MIN..=1 => Self::Low,
            2 => Self::Medium,
            _ => Self::High,
        }
    }

    /// The hub's wire level for this speed.
    pub fn level(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

/// Clamp an AC target temperature into the accepted range.
pub fn clamp_target_temp(value: i64) -> i32 {
    i32::try_from(value.clamp(i64::from(AC_TEMP_MIN), i64::from(AC_TEMP_MAX)))
        .unwrap_or(AC_TEMP_DEFAULT)
}

/// One controllable device.
///
/// `target_temp` is `Some` only for the AC, `fan_speed` only for the
/// fan. [`Device::for_room`] is the only constructor, so the invariant
/// holds everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub id: DeviceId,
    pub kind: DeviceKind,
    pub power: bool,
    pub target_temp: Option<i32>,
    pub fan_speed: Option<FanSpeed>,
}

impl Device {
    /// A device in its boot state for the given room.
    pub fn for_room(id: DeviceId) -> Self {
        let kind = id.kind();
        Self {
            id,
            kind,
            power: false,
            target_temp: (kind == DeviceKind::Ac).then_some(AC_TEMP_DEFAULT),
            fan_speed: (kind == DeviceKind::Fan).then_some(FanSpeed::Low),
        }
    }
}

/// The full device mirror slice — one device per room, always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HouseDevices {
    pub kitchen: Device,
    pub living_room: Device,
    pub bedroom: Device,
}

impl HouseDevices {
    pub fn get(&self, id: DeviceId) -> &Device {
        match id {
            DeviceId::Kitchen => &self.kitchen,
            DeviceId::LivingRoom => &self.living_room,
            DeviceId::Bedroom => &self.bedroom,
        }
    }

    pub fn get_mut(&mut self, id: DeviceId) -> &mut Device {
        match id {
            DeviceId::Kitchen => &mut self.kitchen,
            DeviceId::LivingRoom => &mut self.living_room,
            DeviceId::Bedroom => &mut self.bedroom,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        DeviceId::ALL.iter().map(|id| self.get(*id))
    }
}

impl Default for HouseDevices {
    fn default() -> Self {
        Self {
            kitchen: Device::for_room(DeviceId::Kitchen),
            living_room: Device::for_room(DeviceId::LivingRoom),
            bedroom: Device::for_room(DeviceId::Bedroom),
        }
    }
}

impl From<LightsState> for HouseDevices {
    fn from(wire: LightsState) -> Self {
        let mut devices = Self::default();
        devices.kitchen.power = wire.kitchen == "on";
        devices.living_room.power = wire.livingroom == "on";
        devices.living_room.target_temp = Some(clamp_target_temp(wire.ac_temp));
        devices.bedroom.power = wire.bedroom == "on";
        devices.bedroom.fan_speed = Some(FanSpeed::from_level(wire.fan_speed));
        devices
    }
}
