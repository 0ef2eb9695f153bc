// ── Pending-write bookkeeping ──
//
// Tracks in-flight optimistic writes per device. Two jobs:
//
// 1. Shield: while a device has any write in flight, poll responses must
//    not overwrite its mirror value.
// 2. Epochs: when concurrent writes race on one device, only a failure of
//    the *latest* write rolls the mirror back — earlier failures are
//    superseded (last intent wins).

use dashmap::DashMap;

use crate::model::DeviceId;

#[derive(Default)]
struct PendingEntry {
    latest_epoch: u64,
    in_flight: u32,
}

pub(crate) struct PendingWrites {
    entries: DashMap<DeviceId, PendingEntry>,
}

impl PendingWrites {
    pub(crate) fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register a new write for this device. Returns its epoch.
    pub(crate) fn open(&self, id: DeviceId) -> u64 {
        let mut entry = self.entries.entry(id).or_default();
        entry.latest_epoch += 1;
        entry.in_flight += 1;
        entry.latest_epoch
    }

    /// Retire a write. The shield drops once nothing is in flight.
    pub(crate) fn close(&self, id: DeviceId) {
        let remove = match self.entries.get_mut(&id) {
            Some(mut entry) => {
                entry.in_flight = entry.in_flight.saturating_sub(1);
                entry.in_flight == 0
            }
            None => false,
        };
        if remove {
            self.entries.remove_if(&id, |_, e| e.in_flight == 0);
        }
    }

    /// Whether `epoch` is still the newest write issued for this device.
    pub(crate) fn is_latest(&self, id: DeviceId, epoch: u64) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|e| e.latest_epoch == epoch)
    }

    /// Whether this device has any write in flight.
    pub(crate) fn is_pending(&self, id: DeviceId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.in_flight > 0)
    }
}
