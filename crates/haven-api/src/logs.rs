// Log snapshot endpoints.
//
// Both logs are remote-owned append-only sequences; the hub always
// returns the full current snapshot, never a delta.

use crate::client::HubClient;
use crate::error::Error;
use crate::models::{SystemLogEntry, VoiceLogEntry};

impl HubClient {
    /// Fetch the full system log snapshot.
    pub async fn get_system_logs(&self) -> Result<Vec<SystemLogEntry>, Error> {
        let url = self.url("/logs")?;
        self.get_json(url).await
    }

    /// Fetch the full voice-assistant log snapshot.
    pub async fn get_voice_logs(&self) -> Result<Vec<VoiceLogEntry>, Error> {
        let url = self.url("/voicelogs")?;
        self.get_json(url).await
    }
}
