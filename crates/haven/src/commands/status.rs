use serde::Serialize;
use tabled::Tabled;

use haven_core::{CoreError, HomeHub, HubConfig, ResourceKind, SensorSnapshot};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled, Serialize)]
struct StatusRow {
    #[tabled(rename = "Temperature (°C)")]
    temperature: String,
    #[tabled(rename = "Humidity (%)")]
    humidity: String,
    #[tabled(rename = "Air quality")]
    air_quality: String,
}

impl From<&SensorSnapshot> for StatusRow {
    fn from(s: &SensorSnapshot) -> Self {
        Self {
            temperature: format!("{:.1}", s.temperature),
            humidity: format!("{:.1}", s.humidity),
            air_quality: s.air_quality.to_string(),
        }
    }
}

pub async fn handle(config: HubConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = HomeHub::oneshot(config, |hub| async move {
        hub.refresh(ResourceKind::Sensors).await?;
        hub.mirror().sensors().ok_or(CoreError::Disconnected)
    })
    .await?;

    let row = StatusRow::from(&snapshot);
    let rendered = output::render_single(&row, global.output)?;
    output::print_output(&rendered, global);
    Ok(())
}
