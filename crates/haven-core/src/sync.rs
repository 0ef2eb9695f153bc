// ── Poll loop ──
//
// One task per resource kind. Within a kind, fetches are strictly
// sequential: the next tick is never issued before the previous response
// is applied or discarded. Cancellation between issue and arrival
// discards the in-flight response — a stopped kind never mutates the
// mirror again.

use std::time::Duration;

use strum::Display;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::controller::HomeHub;

/// The five remote-owned resource slices the mirror tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ResourceKind {
    Sensors,
    Devices,
    SystemLogs,
    VoiceLogs,
    Forecast,
}

impl ResourceKind {
    pub const ALL: [Self; 5] = [
        Self::Sensors,
        Self::Devices,
        Self::SystemLogs,
        Self::VoiceLogs,
        Self::Forecast,
    ];
}

/// Background poll task for one resource kind.
///
/// The first tick fires immediately, so the mirror warms as soon as
/// polling starts. Failed fetches are logged at debug and leave the
/// previous slice in place — transient hub trouble must not blank the
/// dashboard or spam the user.
pub(crate) async fn poll_task(
    hub: HomeHub,
    kind: ResourceKind,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                tokio::select! {
                    biased;
                    // In-flight response discarded: nothing is applied
                    // after a stop.
                    () = cancel.cancelled() => break,
                    result = hub.refresh(kind) => {
                        if let Err(e) = result {
                            if e.is_unauthorized() {
                                hub.handle_unauthorized();
                            }
                            debug!(%kind, error = %e, "poll failed; keeping previous snapshot");
                        }
                    }
                }
            }
        }
    }

    debug!(%kind, "poll task stopped");
}
