// Schedule endpoint.

use crate::client::HubClient;
use crate::error::Error;
use crate::models::ScheduleRequest;

impl HubClient {
    /// Register a timed AC/fan program with the hub.
    ///
    /// The hub validates the window server-side; a rejected window comes
    /// back as [`Error::Rejected`] with the hub's reason in the message.
    pub async fn create_schedule(&self, request: &ScheduleRequest) -> Result<(), Error> {
        let url = self.url("/schedule")?;
        self.post_command(url, request).await
    }
}
