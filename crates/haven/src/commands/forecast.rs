use serde::Serialize;
use tabled::Tabled;

use haven_core::{CoreError, ForecastSeries, HomeHub, HubConfig, ResourceKind};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled, Serialize)]
struct ForecastRow {
    #[tabled(rename = "Horizon")]
    horizon: &'static str,
    #[tabled(rename = "Temperature (°C)")]
    temperature: String,
}

fn rows(series: &ForecastSeries) -> Vec<ForecastRow> {
    ForecastSeries::horizon_labels()
        .into_iter()
        .zip(series.points)
        .map(|(horizon, temp)| ForecastRow {
            horizon,
            temperature: format!("{temp:.1}"),
        })
        .collect()
}

pub async fn handle(config: HubConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let series = HomeHub::oneshot(config, |hub| async move {
        hub.refresh(ResourceKind::Forecast).await?;
        hub.mirror().forecast().ok_or(CoreError::Disconnected)
    })
    .await?;

    let rendered = output::render_list(&rows(&series), global.output)?;
    output::print_output(&rendered, global);
    Ok(())
}
