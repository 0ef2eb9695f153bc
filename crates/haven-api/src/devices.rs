// Device state and command endpoints.
//
// Reads come from the combined `GET /lights` payload. Writes are GETs
// with query parameters — the hub predates any REST conventions here.

use crate::client::HubClient;
use crate::error::Error;
use crate::models::LightsState;

impl HubClient {
    /// Fetch the combined device state (all rooms + AC setpoint + fan level).
    pub async fn get_lights(&self) -> Result<LightsState, Error> {
        let url = self.url("/lights")?;
        self.get_json(url).await
    }

    /// Switch a room's device on or off.
    ///
    /// `room` is the hub's wire name (`kitchen`, `livingroom`, `bedroom`).
    pub async fn set_light(&self, room: &str, on: bool) -> Result<(), Error> {
        let mut url = self.url(&format!("/light/{room}"))?;
        url.query_pairs_mut()
            .append_pair("state", if on { "on" } else { "off" });
        self.get_command(url).await
    }

    /// Set the AC target temperature. The caller is responsible for
    /// clamping to the hub's accepted range before dispatch.
    pub async fn set_ac_temperature(&self, value: i32) -> Result<(), Error> {
        let mut url = self.url("/ac/temp")?;
        url.query_pairs_mut()
            .append_pair("value", &value.to_string());
        self.get_command(url).await
    }

    /// Set the fan speed level (1–3).
    pub async fn set_fan_speed(&self, level: u8) -> Result<(), Error> {
        let mut url = self.url("/fan/speed")?;
        url.query_pairs_mut()
            .append_pair("level", &level.to_string());
        self.get_command(url).await
    }
}
