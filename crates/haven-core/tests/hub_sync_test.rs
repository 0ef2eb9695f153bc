#![allow(clippy::unwrap_used)]
// End-to-end tests for the synchronization loop using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use haven_core::{
    CoreError, DeviceId, FanSpeed, HomeHub, HubConfig, NoticeLevel, PollIntervals, ResourceKind,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, HomeHub) {
    let server = MockServer::start().await;
    let url = Url::parse(&server.uri()).unwrap();
    let mut config = HubConfig::new(url, "alice", "test-password".to_string().into());
    config.timeout = Duration::from_secs(2);
    config.intervals = PollIntervals::uniform(Duration::from_millis(50));
    let hub = HomeHub::new(config).unwrap();
    (server, hub)
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "username": "alice",
            "role": "admin"
        })))
        .mount(server)
        .await;
}

fn lights_body(kitchen: &str, livingroom: &str, bedroom: &str, ac: i64, fan: i64) -> serde_json::Value {
    json!({
        "kitchen": kitchen,
        "livingroom": livingroom,
        "bedroom": bedroom,
        "ac_temp": ac,
        "fan_speed": fan
    })
}

async fn mount_lights(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/lights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_login_leaves_no_session() {
    let (server, hub) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let result = hub.login().await;
    assert!(matches!(
        result,
        Err(CoreError::AuthenticationFailed { .. })
    ));
    assert!(hub.session().is_none());
}

#[tokio::test]
async fn polling_401_drops_session_with_one_notice() {
    let (server, hub) = setup().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/lights"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    hub.login().await.unwrap();
    assert!(hub.session().is_some());

    let mut notices = hub.notices();
    hub.start_polling(ResourceKind::Devices).await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    hub.stop_polling(ResourceKind::Devices).await;

    assert!(hub.session().is_none());

    // Several ticks saw the 401, but only the transition raises a notice.
    let mut expiry_notices = 0;
    while let Ok(notice) = notices.try_recv() {
        if notice.level == NoticeLevel::Warning {
            expiry_notices += 1;
        }
    }
    assert_eq!(expiry_notices, 1);
}

// ── Mirror warm-up and staleness ────────────────────────────────────

#[tokio::test]
async fn connect_warms_every_slice() {
    let (server, hub) = setup().await;
    mount_login(&server).await;
    mount_lights(&server, lights_body("on", "off", "off", 24, 1)).await;

    Mock::given(method("GET"))
        .and(path("/sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "temperature": 22.5, "humidity": 48.0, "air_quality": 70.0
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "timestamp": 1_718_450_000.0, "message": "boot" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/voicelogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/temperature_prediction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "temperature_prediction": [21.1, 21.4, 21.0, 20.8, 20.5]
        })))
        .mount(&server)
        .await;

    hub.connect().await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    hub.disconnect().await;

    let mirror = hub.mirror();
    assert!(mirror.devices().kitchen.power);
    assert!(mirror.sensors().is_some());
    assert_eq!(
        mirror.forecast().unwrap().points,
        [21.1, 21.4, 21.0, 20.8, 20.5]
    );
    assert_eq!(mirror.system_logs().len(), 1);
    assert!(mirror.last_refresh(ResourceKind::Devices).is_some());
}

#[tokio::test]
async fn stale_mirror_survives_hub_outage() {
    let (server, hub) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "temperature": 22.5, "humidity": 48.0, "air_quality": "Good"
        })))
        .mount(&server)
        .await;

    hub.refresh(ResourceKind::Sensors).await.unwrap();
    let before = hub.mirror().sensors().unwrap();
    let stamp = hub.mirror().last_refresh(ResourceKind::Sensors).unwrap();

    // Hub goes away; every further poll fails.
    server.reset().await;
    let result = hub.refresh(ResourceKind::Sensors).await;
    assert!(result.is_err());

    assert_eq!(hub.mirror().sensors().unwrap(), before);
    assert_eq!(
        hub.mirror().last_refresh(ResourceKind::Sensors).unwrap(),
        stamp
    );
}

#[tokio::test]
async fn forecast_with_wrong_arity_is_a_failed_poll() {
    let (server, hub) = setup().await;

    Mock::given(method("GET"))
        .and(path("/temperature_prediction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "temperature_prediction": [21.1, 21.4, 21.0, 20.8, 20.5]
        })))
        .mount(&server)
        .await;
    hub.refresh(ResourceKind::Forecast).await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/temperature_prediction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "temperature_prediction": [21.1, 21.4]
        })))
        .mount(&server)
        .await;

    let result = hub.refresh(ResourceKind::Forecast).await;
    assert!(result.is_err());
    assert_eq!(
        hub.mirror().forecast().unwrap().points,
        [21.1, 21.4, 21.0, 20.8, 20.5]
    );
}

// ── Optimistic writes ───────────────────────────────────────────────

#[tokio::test]
async fn optimistic_value_is_visible_before_confirmation() {
    let (server, hub) = setup().await;

    Mock::given(method("GET"))
        .and(path("/light/kitchen"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let writer = {
        let hub = hub.clone();
        tokio::spawn(async move { hub.set_power(DeviceId::Kitchen, true).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(
        hub.mirror().device(DeviceId::Kitchen).power,
        "optimistic value must be visible while the write is in flight"
    );
    assert!(hub.mirror().is_write_pending(DeviceId::Kitchen));

    writer.await.unwrap().unwrap();
    assert!(hub.mirror().device(DeviceId::Kitchen).power);
    assert!(!hub.mirror().is_write_pending(DeviceId::Kitchen));
}

#[tokio::test]
async fn rejected_write_rolls_back_and_raises_notice() {
    let (server, hub) = setup().await;
    mount_lights(&server, lights_body("off", "off", "off", 27, 1)).await;
    hub.refresh(ResourceKind::Devices).await.unwrap();

    Mock::given(method("GET"))
        .and(path("/ac/temp"))
        .respond_with(ResponseTemplate::new(500).set_body_string("nope"))
        .mount(&server)
        .await;

    let mut notices = hub.notices();
    let result = hub.set_ac_temperature(30).await;

    assert!(matches!(result, Err(CoreError::WriteRejected { .. })));
    assert_eq!(
        hub.mirror().device(DeviceId::LivingRoom).target_temp,
        Some(27),
        "mirror must roll back to the exact pre-write value"
    );

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.message, "Failed to control AC!");
    assert_eq!(notice.level, NoticeLevel::Error);
}

#[tokio::test]
async fn out_of_range_writes_are_clamped_before_dispatch() {
    let (server, hub) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ac/temp"))
        .and(query_param("value", "32"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fan/speed"))
        .and(query_param("level", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    hub.set_ac_temperature(40).await.unwrap();
    hub.set_fan_speed(0).await.unwrap();

    assert_eq!(
        hub.mirror().device(DeviceId::LivingRoom).target_temp,
        Some(32)
    );
    assert_eq!(
        hub.mirror().device(DeviceId::Bedroom).fan_speed,
        Some(FanSpeed::Low)
    );
}

#[tokio::test]
async fn idempotent_write_sends_nothing() {
    let (server, hub) = setup().await;
    mount_lights(&server, lights_body("on", "off", "off", 24, 1)).await;
    hub.refresh(ResourceKind::Devices).await.unwrap();

    // The kitchen light is already on; no command may be issued.
    Mock::given(method("GET"))
        .and(path("/light/kitchen"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    hub.set_power(DeviceId::Kitchen, true).await.unwrap();
    assert!(hub.mirror().device(DeviceId::Kitchen).power);
}

#[tokio::test]
async fn racing_writes_settle_on_the_later_intent() {
    let (server, hub) = setup().await;
    mount_lights(&server, lights_body("off", "off", "off", 24, 1)).await;
    hub.refresh(ResourceKind::Devices).await.unwrap();

    // Write A (28) is slow and fails; write B (20) lands while A is in
    // flight and succeeds. The mirror must settle on B's value.
    Mock::given(method("GET"))
        .and(path("/ac/temp"))
        .and(query_param("value", "28"))
        .respond_with(
            ResponseTemplate::new(500).set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ac/temp"))
        .and(query_param("value", "20"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let slow = {
        let hub = hub.clone();
        tokio::spawn(async move { hub.set_ac_temperature(28).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    hub.set_ac_temperature(20).await.unwrap();
    let slow_result = slow.await.unwrap();
    assert!(slow_result.is_err());

    assert_eq!(
        hub.mirror().device(DeviceId::LivingRoom).target_temp,
        Some(20),
        "the later intent must win regardless of completion order"
    );
}

#[tokio::test]
async fn poll_landing_mid_write_does_not_clobber_optimism() {
    let (server, hub) = setup().await;
    // Hub still reports the light off; our write is in flight.
    mount_lights(&server, lights_body("off", "off", "off", 24, 1)).await;

    Mock::given(method("GET"))
        .and(path("/light/kitchen"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let writer = {
        let hub = hub.clone();
        tokio::spawn(async move { hub.set_power(DeviceId::Kitchen, true).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    hub.refresh(ResourceKind::Devices).await.unwrap();
    assert!(
        hub.mirror().device(DeviceId::Kitchen).power,
        "a poll must not overwrite a device with a write in flight"
    );

    writer.await.unwrap().unwrap();
    assert!(hub.mirror().device(DeviceId::Kitchen).power);
}

// ── Cancellation ────────────────────────────────────────────────────

#[tokio::test]
async fn stop_polling_discards_in_flight_response() {
    let (server, hub) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lights"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(lights_body("on", "on", "on", 30, 3))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    hub.start_polling(ResourceKind::Devices).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    // The first tick's request is still in flight.
    hub.stop_polling(ResourceKind::Devices).await;

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(
        !hub.mirror().devices().kitchen.power,
        "a response arriving after stop must be discarded"
    );
    assert!(hub.mirror().last_refresh(ResourceKind::Devices).is_none());
}

#[tokio::test]
async fn start_polling_twice_keeps_a_single_issuer() {
    let (server, hub) = setup().await;
    mount_lights(&server, lights_body("on", "off", "off", 24, 1)).await;

    hub.start_polling(ResourceKind::Devices).await;
    hub.start_polling(ResourceKind::Devices).await;
    tokio::time::sleep(Duration::from_millis(120)).await;
    hub.stop_polling(ResourceKind::Devices).await;

    // A second start must not have spawned a second task; after stop,
    // nothing polls this kind any more.
    let stamp = hub.mirror().last_refresh(ResourceKind::Devices);
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(hub.mirror().last_refresh(ResourceKind::Devices), stamp);
}

// ── Downloads and pass-throughs ─────────────────────────────────────

#[tokio::test]
async fn log_download_reserializes_the_last_snapshot() {
    let (server, hub) = setup().await;

    Mock::given(method("GET"))
        .and(path("/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "timestamp": 1_718_450_000.0, "message": "Kitchen light turned on" }
        ])))
        .mount(&server)
        .await;

    hub.refresh(ResourceKind::SystemLogs).await.unwrap();
    let json = hub.system_logs_json().unwrap();
    assert!(json.contains("Kitchen light turned on"));
}

#[tokio::test]
async fn schedule_clamps_and_posts() {
    use chrono::{TimeZone, Utc};

    let (server, hub) = setup().await;

    Mock::given(method("POST"))
        .and(path("/schedule"))
        .and(wiremock::matchers::body_partial_json(json!({
            "ac_temp": 32,
            "fan_speed": 3
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    hub.create_schedule(
        Utc.with_ymd_and_hms(2026, 8, 25, 18, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 8, 25, 22, 0, 0).unwrap(),
        40,
        9,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn video_feed_url_joins_base() {
    let (server, hub) = setup().await;
    let url = hub.video_feed_url().unwrap();
    assert_eq!(url.as_str(), format!("{}/video_feed", server.uri()));
}
