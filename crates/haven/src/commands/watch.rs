// Live dashboard: connect, let the poll tasks keep the mirror fresh, and
// re-render snapshots on a fixed cadence until Ctrl-C.

use std::time::Duration;

use owo_colors::OwoColorize;

use haven_core::{HomeHub, HubConfig, Notice, NoticeLevel};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: WatchArgs, config: HubConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let hub = HomeHub::new(config)?;
    let mut notices = hub.notices();
    hub.connect().await?;
    let mut session = hub.subscribe_session();

    let color = output::should_color(global.color);
    let mut tick = tokio::time::interval(Duration::from_secs(args.interval.max(1)));

    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break Ok(()),

            changed = session.changed() => {
                // The store dropped the session (hub answered 401/403).
                if changed.is_err() || session.borrow().is_none() {
                    break Err(CliError::AuthFailed {
                        message: "session expired".into(),
                    });
                }
            }

            notice = notices.recv() => {
                if let Ok(notice) = notice {
                    print_notice(&notice, color);
                }
            }

            _ = tick.tick() => render_frame(&hub, color),
        }
    };

    hub.disconnect().await;
    result
}

fn render_frame(hub: &HomeHub, color: bool) {
    let mirror = hub.mirror();
    let now = chrono::Local::now().format("%H:%M:%S");
    println!("── {now} ──────────────────────────────");

    if let Some(s) = mirror.sensors() {
        println!(
            "  sensors   {:.1} °C   {:.1} %   air {}",
            s.temperature, s.humidity, s.air_quality
        );
    } else {
        println!("  sensors   (waiting for first poll)");
    }

    let devices = mirror.devices();
    for device in devices.iter() {
        let power = if device.power { "on " } else { "off" };
        let power = if color {
            if device.power {
                power.green().to_string()
            } else {
                power.red().to_string()
            }
        } else {
            power.to_owned()
        };
        let setting = match (device.target_temp, device.fan_speed) {
            (Some(temp), _) => format!("  {temp} °C"),
            (_, Some(speed)) => format!("  speed {}", speed.level()),
            _ => String::new(),
        };
        println!("  {:<10}{power}{setting}", device.id.to_string());
    }

    if let Some(f) = mirror.forecast() {
        let points: Vec<String> = f.points.iter().map(|t| format!("{t:.1}")).collect();
        println!("  forecast  {}", points.join("  "));
    }
}

fn print_notice(notice: &Notice, color: bool) {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warn",
        NoticeLevel::Error => "error",
    };
    if color {
        let tag = match notice.level {
            NoticeLevel::Info => tag.blue().to_string(),
            NoticeLevel::Warning => tag.yellow().to_string(),
            NoticeLevel::Error => tag.red().to_string(),
        };
        eprintln!("[{tag}] {}", notice.message);
    } else {
        eprintln!("[{tag}] {}", notice.message);
    }
}
