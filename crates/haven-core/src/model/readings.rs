// ── Sensor and forecast model ──

use serde::Serialize;

use haven_api::models::{SensorReadings, WireAirQuality};
use haven_api::{FORECAST_POINTS, models::ForecastPayload};

/// Air quality as the hub reports it — a numeric index or a sensor label,
/// depending on the backend the hub runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AirQuality {
    Index(f64),
    Label(String),
}

impl std::fmt::Display for AirQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(v) => write!(f, "{v:.1}"),
            Self::Label(s) => f.write_str(s),
        }
    }
}

/// One full environment snapshot. Replaced wholesale on every poll —
/// the mirror never merges individual sensor fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub temperature: f64,
    pub humidity: f64,
    pub air_quality: AirQuality,
}

impl From<SensorReadings> for SensorSnapshot {
    fn from(wire: SensorReadings) -> Self {
        Self {
            temperature: wire.temperature,
            humidity: wire.humidity,
            air_quality: match wire.air_quality {
                WireAirQuality::Index(v) => AirQuality::Index(v),
                WireAirQuality::Label(s) => AirQuality::Label(s),
            },
        }
    }
}

/// Predicted temperatures for the next five hours, in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastSeries {
    pub points: [f64; FORECAST_POINTS],
}

impl ForecastSeries {
    pub fn new(points: [f64; FORECAST_POINTS]) -> Self {
        Self { points }
    }

    /// Horizon labels matching `points` by index: `+1h` through `+5h`.
    pub fn horizon_labels() -> [&'static str; FORECAST_POINTS] {
        ["+1h", "+2h", "+3h", "+4h", "+5h"]
    }
}

impl ForecastSeries {
    pub fn from_payload(wire: ForecastPayload) -> Option<Self> {
        <[f64; FORECAST_POINTS]>::try_from(wire.temperature_prediction.as_slice())
            .ok()
            .map(ForecastSeries::new)
    }
}
