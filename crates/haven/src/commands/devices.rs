use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;

use haven_core::{Device, HomeHub, HouseDevices, HubConfig, ResourceKind};

use crate::cli::{DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled, Serialize)]
struct DeviceRow {
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Device")]
    kind: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Setting")]
    setting: String,
}

impl DeviceRow {
    fn new(device: &Device, color: bool) -> Self {
        let power = if device.power { "on" } else { "off" };
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
            (Some(temp), _) => format!("{temp} °C"),
            (_, Some(speed)) => format!("speed {}", speed.level()),
            _ => "-".to_owned(),
        };

        Self {
            room: device.id.to_string(),
            kind: device.kind.label().to_owned(),
            power,
            setting,
        }
    }
}

fn rows(devices: &HouseDevices, color: bool) -> Vec<DeviceRow> {
    devices.iter().map(|d| DeviceRow::new(d, color)).collect()
}

pub async fn handle(
    command: DevicesCommand,
    config: HubConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        DevicesCommand::List => list(config, global).await,
    }
}

async fn list(config: HubConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = HomeHub::oneshot(config, |hub| async move {
        hub.refresh(ResourceKind::Devices).await?;
        Ok(hub.mirror().devices())
    })
    .await?;

    let color = output::should_color(global.color);
    let rendered = output::render_list(&rows(&devices, color), global.output)?;
    output::print_output(&rendered, global);
    Ok(())
}
