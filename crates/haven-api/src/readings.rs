// Sensor and forecast endpoints.

use crate::client::HubClient;
use crate::error::Error;
use crate::models::{ForecastPayload, SensorReadings};
use crate::FORECAST_POINTS;

impl HubClient {
    /// Fetch the current sensor snapshot.
    pub async fn get_sensors(&self) -> Result<SensorReadings, Error> {
        let url = self.url("/sensors")?;
        self.get_json(url).await
    }

    /// Fetch the temperature forecast for the next five hours.
    ///
    /// The wire contract is exactly [`FORECAST_POINTS`] values; any other
    /// arity is a malformed payload and the previous series stays in place.
    pub async fn get_forecast(&self) -> Result<[f64; FORECAST_POINTS], Error> {
        let url = self.url("/temperature_prediction")?;
        let payload: ForecastPayload = self.get_json(url).await?;

        <[f64; FORECAST_POINTS]>::try_from(payload.temperature_prediction.as_slice()).map_err(
            |_| Error::Malformed {
                message: format!(
                    "forecast arity {} (expected {FORECAST_POINTS})",
                    payload.temperature_prediction.len()
                ),
            },
        )
    }
}
