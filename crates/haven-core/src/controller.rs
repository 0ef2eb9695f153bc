// ── HomeHub ──
//
// Facade over the session store, the mirror, and the poll loop. Cheaply
// cloneable via `Arc<HubInner>`; poll tasks hold clones.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use haven_api::models::ScheduleRequest;
use haven_api::{HubClient, TransportConfig};

use crate::config::HubConfig;
use crate::error::CoreError;
use crate::model::{DeviceId, FanSpeed, ForecastSeries, Session, clamp_target_temp};
use crate::session::SessionStore;
use crate::store::{Mirror, WriteTicket};
use crate::sync::{self, ResourceKind};

const NOTICE_CHANNEL_SIZE: usize = 64;

/// User-facing message raised by the core: write rejections, session
/// expiry. Poll failures never produce notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

struct PollHandle {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// The main entry point for consumers.
///
/// [`connect()`](Self::connect) authenticates and spawns one poll task
/// per resource kind; [`disconnect()`](Self::disconnect) stops them and
/// clears the session. All reads go through the [`Mirror`]; all device
/// writes go through the optimistic write path.
#[derive(Clone)]
pub struct HomeHub {
    inner: Arc<HubInner>,
}

struct HubInner {
    config: HubConfig,
    client: HubClient,
    session: SessionStore,
    mirror: Mirror,
    notices: broadcast::Sender<Notice>,
    cancel: CancellationToken,
    tasks: Mutex<HashMap<ResourceKind, PollHandle>>,
}

impl HomeHub {
    /// Build a hub handle from configuration. Does not touch the network;
    /// call [`connect()`](Self::connect) or [`login()`](Self::login).
    pub fn new(config: HubConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = HubClient::new(config.url.clone(), &transport)?;
        let (notices, _) = broadcast::channel(NOTICE_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(HubInner {
                config,
                client,
                session: SessionStore::new(),
                mirror: Mirror::new(),
                notices,
                cancel: CancellationToken::new(),
                tasks: Mutex::new(HashMap::new()),
            }),
        })
    }

    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    pub fn mirror(&self) -> &Mirror {
        &self.inner.mirror
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Authenticate with the configured credentials.
    pub async fn login(&self) -> Result<Session, CoreError> {
        self.inner
            .session
            .login(
                &self.inner.client,
                &self.inner.config.username,
                &self.inner.config.password,
            )
            .await
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.session.current()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<Option<Session>> {
        self.inner.session.subscribe()
    }

    /// Drop the session after the hub answered 401/403 anywhere. The
    /// expiry notice fires once per transition, however many concurrent
    /// requests observe it.
    pub(crate) fn handle_unauthorized(&self) {
        if self.inner.session.note_unauthorized() {
            warn!("hub rejected credentials; session dropped");
            self.notify(
                NoticeLevel::Warning,
                "Session expired, please log in again.".to_owned(),
            );
        }
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Login and start polling every resource kind.
    pub async fn connect(&self) -> Result<Session, CoreError> {
        let session = self.login().await?;
        for kind in ResourceKind::ALL {
            self.start_polling(kind).await;
        }
        info!("connected to hub");
        Ok(session)
    }

    /// Stop all polling and clear the session. The hub keeps no
    /// server-side session, so logout is purely local.
    pub async fn disconnect(&self) {
        let handles: Vec<PollHandle> = {
            let mut tasks = self.inner.tasks.lock().await;
            tasks.drain().map(|(_, h)| h).collect()
        };
        for PollHandle { cancel, handle } in handles {
            cancel.cancel();
            let _ = handle.await;
        }
        self.inner.session.logout();
        debug!("disconnected");
    }

    /// Start the background poll task for one kind. No-op if already
    /// running — a kind never has two concurrent issuers.
    pub async fn start_polling(&self, kind: ResourceKind) {
        let mut tasks = self.inner.tasks.lock().await;
        if tasks.contains_key(&kind) {
            return;
        }
        let cancel = self.inner.cancel.child_token();
        let period = self.inner.config.intervals.for_kind(kind);
        let handle = tokio::spawn(sync::poll_task(self.clone(), kind, period, cancel.clone()));
        tasks.insert(kind, PollHandle { cancel, handle });
        debug!(%kind, ?period, "poll task started");
    }

    /// Stop polling one kind. By the time this returns, the task has
    /// exited and any in-flight response has been discarded — the mirror
    /// will see no further writes for this kind.
    pub async fn stop_polling(&self, kind: ResourceKind) {
        let entry = self.inner.tasks.lock().await.remove(&kind);
        if let Some(PollHandle { cancel, handle }) = entry {
            cancel.cancel();
            let _ = handle.await;
        }
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch one resource kind and apply it to the mirror. Poll tasks
    /// call this on every tick; one-shot CLI commands call it directly.
    pub async fn refresh(&self, kind: ResourceKind) -> Result<(), CoreError> {
        let client = &self.inner.client;
        let mirror = &self.inner.mirror;

        match kind {
            ResourceKind::Sensors => {
                mirror.apply_sensors(client.get_sensors().await?.into());
            }
            ResourceKind::Devices => {
                mirror.apply_devices(&client.get_lights().await?.into());
            }
            ResourceKind::SystemLogs => {
                let entries = client.get_system_logs().await?;
                mirror.apply_system_logs(entries.into_iter().map(Into::into).collect());
            }
            ResourceKind::VoiceLogs => {
                let entries = client.get_voice_logs().await?;
                mirror.apply_voice_logs(entries.into_iter().map(Into::into).collect());
            }
            ResourceKind::Forecast => {
                mirror.apply_forecast(ForecastSeries::new(client.get_forecast().await?));
            }
        }
        Ok(())
    }

    // ── Device writes (optimistic) ───────────────────────────────────

    /// Switch a device on or off.
    pub async fn set_power(&self, id: DeviceId, on: bool) -> Result<(), CoreError> {
        let mirror = &self.inner.mirror;
        if !mirror.is_write_pending(id) && mirror.device(id).power == on {
            debug!(%id, on, "power already at desired state; skipping write");
            return Ok(());
        }

        let ticket = mirror.begin_write(id, |d| d.power = on);
        let result = self.inner.client.set_light(id.wire_name(), on).await;
        self.finish_write(id, ticket, result)
    }

    /// Set the AC target temperature. Out-of-range values clamp to the
    /// accepted range before anything is sent.
    pub async fn set_ac_temperature(&self, value: i64) -> Result<(), CoreError> {
        let target = clamp_target_temp(value);
        let id = DeviceId::LivingRoom;
        let mirror = &self.inner.mirror;

        if !mirror.is_write_pending(id) && mirror.device(id).target_temp == Some(target) {
            debug!(target, "AC already at desired setpoint; skipping write");
            return Ok(());
        }

        let ticket = mirror.begin_write(id, |d| d.target_temp = Some(target));
        let result = self.inner.client.set_ac_temperature(target).await;
        self.finish_write(id, ticket, result)
    }

    /// Set the fan speed. Out-of-range levels clamp to 1–3.
    pub async fn set_fan_speed(&self, level: i64) -> Result<(), CoreError> {
        let speed = FanSpeed::from_level(level);
        let id = DeviceId::Bedroom;
        let mirror = &self.inner.mirror;

        if !mirror.is_write_pending(id) && mirror.device(id).fan_speed == Some(speed) {
            debug!(?speed, "fan already at desired speed; skipping write");
            return Ok(());
        }

        let ticket = mirror.begin_write(id, |d| d.fan_speed = Some(speed));
        let result = self.inner.client.set_fan_speed(speed.level()).await;
        self.finish_write(id, ticket, result)
    }

    fn finish_write(
        &self,
        id: DeviceId,
        ticket: WriteTicket,
        result: Result<(), haven_api::Error>,
    ) -> Result<(), CoreError> {
        match result {
            Ok(()) => {
                self.inner.mirror.complete_write(ticket, true);
                Ok(())
            }
            Err(e) => {
                self.inner.mirror.complete_write(ticket, false);
                if e.is_unauthorized() {
                    self.handle_unauthorized();
                }
                let device = id.kind().label();
                self.notify(NoticeLevel::Error, format!("Failed to control {device}!"));
                Err(CoreError::WriteRejected { device, source: e })
            }
        }
    }

    // ── Pass-throughs ────────────────────────────────────────────────

    /// Register a timed AC/fan program. Values clamp like direct writes.
    pub async fn create_schedule(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        ac_temp: i64,
        fan_level: i64,
    ) -> Result<(), CoreError> {
        let request = ScheduleRequest {
            start_time: start,
            end_time: end,
            ac_temp: clamp_target_temp(ac_temp),
            fan_speed: FanSpeed::from_level(fan_level).level(),
        };
        self.inner.client.create_schedule(&request).await.map_err(|e| {
            if e.is_unauthorized() {
                self.handle_unauthorized();
            }
            CoreError::Api(e)
        })
    }

    /// The camera stream URL. The stream itself is consumed by an
    /// external viewer; the client never decodes it.
    pub fn video_feed_url(&self) -> Result<Url, CoreError> {
        Ok(self.inner.client.video_feed_url()?)
    }

    /// The last system-log snapshot, pretty-printed for download.
    pub fn system_logs_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(
            &*self.inner.mirror.system_logs(),
        )?)
    }

    /// The last voice-log snapshot, pretty-printed for download.
    pub fn voice_logs_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(
            &*self.inner.mirror.voice_logs(),
        )?)
    }

    // ── Notices ──────────────────────────────────────────────────────

    /// Subscribe to user-facing notices.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    fn notify(&self, level: NoticeLevel, message: String) {
        let _ = self.inner.notices.send(Notice { level, message });
    }

    // ── One-shot convenience ─────────────────────────────────────────

    /// One-shot: login, run closure, disconnect. No poll tasks are
    /// spawned — the closure refreshes exactly the slices it needs.
    pub async fn oneshot<F, Fut, T>(config: HubConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(HomeHub) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let hub = HomeHub::new(config)?;
        hub.login().await?;
        let result = f(hub.clone()).await;
        hub.disconnect().await;
        result
    }
}
