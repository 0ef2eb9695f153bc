// ── Mirror ──
//
// One `watch` channel per resource slice. Snapshot reads never touch the
// network; poll tasks and the write path are the only mutators. Failed
// polls leave the previous slice intact, so a stale mirror stays
// renderable indefinitely.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::watch;

use super::pending::PendingWrites;
use crate::model::{
    Device, DeviceId, ForecastSeries, HouseDevices, SensorSnapshot, SystemLogEntry, VoiceExchange,
};
use crate::sync::ResourceKind;

/// Handle for one optimistic write: which device, which epoch, and the
/// exact value to restore if the hub rejects it.
pub(crate) struct WriteTicket {
    device: DeviceId,
    epoch: u64,
    rollback: Device,
}

pub struct Mirror {
    devices: watch::Sender<HouseDevices>,
    sensors: watch::Sender<Option<SensorSnapshot>>,
    forecast: watch::Sender<Option<ForecastSeries>>,
    system_logs: watch::Sender<Arc<Vec<SystemLogEntry>>>,
    voice_logs: watch::Sender<Arc<Vec<VoiceExchange>>>,
    pending: PendingWrites,
    last_refresh: DashMap<ResourceKind, DateTime<Utc>>,
}

impl Mirror {
    pub fn new() -> Self {
        let (devices, _) = watch::channel(HouseDevices::default());
        let (sensors, _) = watch::channel(None);
        let (forecast, _) = watch::channel(None);
        let (system_logs, _) = watch::channel(Arc::new(Vec::new()));
        let (voice_logs, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            devices,
            sensors,
            forecast,
            system_logs,
            voice_logs,
            pending: PendingWrites::new(),
            last_refresh: DashMap::new(),
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn devices(&self) -> HouseDevices {
        self.devices.borrow().clone()
    }

    pub fn device(&self, id: DeviceId) -> Device {
        self.devices.borrow().get(id).clone()
    }

    pub fn sensors(&self) -> Option<SensorSnapshot> {
        self.sensors.borrow().clone()
    }

    pub fn forecast(&self) -> Option<ForecastSeries> {
        *self.forecast.borrow()
    }

    pub fn system_logs(&self) -> Arc<Vec<SystemLogEntry>> {
        Arc::clone(&self.system_logs.borrow())
    }

    pub fn voice_logs(&self) -> Arc<Vec<VoiceExchange>> {
        Arc::clone(&self.voice_logs.borrow())
    }

    /// When this slice last applied a successful poll, if ever.
    pub fn last_refresh(&self, kind: ResourceKind) -> Option<DateTime<Utc>> {
        self.last_refresh.get(&kind).map(|t| *t)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_devices(&self) -> watch::Receiver<HouseDevices> {
        self.devices.subscribe()
    }

    pub fn subscribe_sensors(&self) -> watch::Receiver<Option<SensorSnapshot>> {
        self.sensors.subscribe()
    }

    pub fn subscribe_forecast(&self) -> watch::Receiver<Option<ForecastSeries>> {
        self.forecast.subscribe()
    }

    pub fn subscribe_system_logs(&self) -> watch::Receiver<Arc<Vec<SystemLogEntry>>> {
        self.system_logs.subscribe()
    }

    pub fn subscribe_voice_logs(&self) -> watch::Receiver<Arc<Vec<VoiceExchange>>> {
        self.voice_logs.subscribe()
    }

    // ── Poll application ─────────────────────────────────────────────
    //
    // Remote-owned slices are replaced wholesale. Devices are the one
    // exception: a device with writes in flight keeps its optimistic
    // value — the hub's response may predate our write.

    pub(crate) fn apply_devices(&self, incoming: &HouseDevices) {
        self.devices.send_modify(|current| {
            for id in DeviceId::ALL {
                if !self.pending.is_pending(id) {
                    *current.get_mut(id) = incoming.get(id).clone();
                }
            }
        });
        self.mark_refreshed(ResourceKind::Devices);
    }

    pub(crate) fn apply_sensors(&self, snapshot: SensorSnapshot) {
        self.sensors.send_replace(Some(snapshot));
        self.mark_refreshed(ResourceKind::Sensors);
    }

    pub(crate) fn apply_forecast(&self, series: ForecastSeries) {
        self.forecast.send_replace(Some(series));
        self.mark_refreshed(ResourceKind::Forecast);
    }

    pub(crate) fn apply_system_logs(&self, entries: Vec<SystemLogEntry>) {
        self.system_logs.send_replace(Arc::new(entries));
        self.mark_refreshed(ResourceKind::SystemLogs);
    }

    pub(crate) fn apply_voice_logs(&self, entries: Vec<VoiceExchange>) {
        self.voice_logs.send_replace(Arc::new(entries));
        self.mark_refreshed(ResourceKind::VoiceLogs);
    }

    fn mark_refreshed(&self, kind: ResourceKind) {
        self.last_refresh.insert(kind, Utc::now());
    }

    // ── Optimistic write path ────────────────────────────────────────

    /// Start an optimistic write: capture the rollback point and apply
    /// the desired value in one `send_modify`, after registering the
    /// pending shield (so a racing poll can't slip in between).
    pub(crate) fn begin_write(
        &self,
        id: DeviceId,
        apply: impl FnOnce(&mut Device),
    ) -> WriteTicket {
        let epoch = self.pending.open(id);
        let mut rollback = Device::for_room(id);
        self.devices.send_modify(|house| {
            let device = house.get_mut(id);
            rollback = device.clone();
            apply(device);
        });
        WriteTicket {
            device: id,
            epoch,
            rollback,
        }
    }

    /// Finish a write. Success keeps the optimistic value. Failure rolls
    /// back to the ticket's captured value — unless a later write for the
    /// same device has been issued since, in which case the later intent
    /// wins and this failure changes nothing.
    pub(crate) fn complete_write(&self, ticket: WriteTicket, success: bool) {
        if !success && self.pending.is_latest(ticket.device, ticket.epoch) {
            self.devices
                .send_modify(|house| *house.get_mut(ticket.device) = ticket.rollback);
        }
        self.pending.close(ticket.device);
    }

    /// Whether this device currently has a write in flight.
    pub fn is_write_pending(&self, id: DeviceId) -> bool {
        self.pending.is_pending(id)
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FanSpeed;
    use pretty_assertions::assert_eq;

    fn incoming(kitchen_on: bool, ac_temp: i32, fan: FanSpeed) -> HouseDevices {
        let mut devices = HouseDevices::default();
        devices.kitchen.power = kitchen_on;
        devices.living_room.target_temp = Some(ac_temp);
        devices.bedroom.fan_speed = Some(fan);
        devices
    }

    #[test]
    fn failed_write_rolls_back_to_exact_prior_value() {
        let mirror = Mirror::new();
        mirror.apply_devices(&incoming(false, 27, FanSpeed::Medium));
        let before = mirror.device(DeviceId::LivingRoom);

        let ticket = mirror.begin_write(DeviceId::LivingRoom, |d| d.target_temp = Some(30));
        assert_eq!(
            mirror.device(DeviceId::LivingRoom).target_temp,
            Some(30),
            "optimistic value must be visible immediately"
        );

        mirror.complete_write(ticket, false);
        assert_eq!(mirror.device(DeviceId::LivingRoom), before);
    }

    #[test]
    fn successful_write_keeps_optimistic_value() {
        let mirror = Mirror::new();
        let ticket = mirror.begin_write(DeviceId::Kitchen, |d| d.power = true);
        mirror.complete_write(ticket, true);

        assert!(mirror.device(DeviceId::Kitchen).power);
        assert!(!mirror.is_write_pending(DeviceId::Kitchen));
    }

    #[test]
    fn later_write_survives_earlier_failure() {
        let mirror = Mirror::new();
        mirror.apply_devices(&incoming(false, 24, FanSpeed::Low));

        let a = mirror.begin_write(DeviceId::LivingRoom, |d| d.target_temp = Some(28));
        let b = mirror.begin_write(DeviceId::LivingRoom, |d| d.target_temp = Some(20));

        // A's failure must not roll back B's intent.
        mirror.complete_write(a, false);
        assert_eq!(mirror.device(DeviceId::LivingRoom).target_temp, Some(20));

        mirror.complete_write(b, true);
        assert_eq!(mirror.device(DeviceId::LivingRoom).target_temp, Some(20));
        assert!(!mirror.is_write_pending(DeviceId::LivingRoom));
    }

    #[test]
    fn failure_of_latest_write_rolls_back_past_superseded_one() {
        let mirror = Mirror::new();
        mirror.apply_devices(&incoming(false, 24, FanSpeed::Low));

        let a = mirror.begin_write(DeviceId::LivingRoom, |d| d.target_temp = Some(28));
        let b = mirror.begin_write(DeviceId::LivingRoom, |d| d.target_temp = Some(20));

        mirror.complete_write(a, true);
        // B captured 28 as its rollback point; its failure restores that.
        mirror.complete_write(b, false);
        assert_eq!(mirror.device(DeviceId::LivingRoom).target_temp, Some(28));
    }

    #[test]
    fn polls_do_not_clobber_pending_devices() {
        let mirror = Mirror::new();
        let ticket = mirror.begin_write(DeviceId::Kitchen, |d| d.power = true);

        // A poll response that predates the write arrives mid-flight.
        mirror.apply_devices(&incoming(false, 26, FanSpeed::High));

        assert!(
            mirror.device(DeviceId::Kitchen).power,
            "optimistic value must survive the poll"
        );
        // Devices without pending writes are replaced as usual.
        assert_eq!(mirror.device(DeviceId::LivingRoom).target_temp, Some(26));

        mirror.complete_write(ticket, true);
        assert!(mirror.device(DeviceId::Kitchen).power);
    }

    #[test]
    fn non_device_slices_replace_wholesale() {
        let mirror = Mirror::new();
        assert!(mirror.sensors().is_none());
        assert!(mirror.last_refresh(ResourceKind::Sensors).is_none());

        mirror.apply_sensors(SensorSnapshot {
            temperature: 22.5,
            humidity: 48.0,
            air_quality: crate::model::AirQuality::Index(70.0),
        });
        assert!(mirror.sensors().is_some());
        assert!(mirror.last_refresh(ResourceKind::Sensors).is_some());

        mirror.apply_system_logs(vec![]);
        assert!(mirror.system_logs().is_empty());
    }
}
