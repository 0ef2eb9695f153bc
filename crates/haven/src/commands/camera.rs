use haven_core::{HomeHub, HubConfig};

use crate::error::CliError;

/// Print the camera stream URL. Purely local — the stream is consumed by
/// an external viewer, so no login round-trip is needed.
pub fn handle(config: HubConfig) -> Result<(), CliError> {
    let hub = HomeHub::new(config)?;
    let url = hub.video_feed_url()?;
    println!("{url}");
    Ok(())
}
