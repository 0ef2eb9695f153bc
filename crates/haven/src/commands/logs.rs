use std::path::Path;

use serde::Serialize;
use tabled::Tabled;

use haven_core::{HomeHub, HubConfig, ResourceKind};

use crate::cli::{GlobalOpts, LogsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled, Serialize)]
struct SystemLogRow {
    #[tabled(rename = "Time (UTC)")]
    timestamp: String,
    #[tabled(rename = "Message")]
    message: String,
}

#[derive(Tabled, Serialize)]
struct VoiceRow {
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Assistant")]
    assistant: String,
}

pub async fn system(args: LogsArgs, config: HubConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let (entries, json) = HomeHub::oneshot(config, |hub| async move {
        hub.refresh(ResourceKind::SystemLogs).await?;
        let json = hub.system_logs_json()?;
        Ok((hub.mirror().system_logs(), json))
    })
    .await?;

    if let Some(ref path) = args.download {
        return download(path, &json, entries.len(), global);
    }

    let rows: Vec<SystemLogRow> = entries
        .iter()
        .map(|e| SystemLogRow {
            timestamp: e.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            message: e.message.clone(),
        })
        .collect();
    let rendered = output::render_list(&rows, global.output)?;
    output::print_output(&rendered, global);
    Ok(())
}

pub async fn voice(args: LogsArgs, config: HubConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let (entries, json) = HomeHub::oneshot(config, |hub| async move {
        hub.refresh(ResourceKind::VoiceLogs).await?;
        let json = hub.voice_logs_json()?;
        Ok((hub.mirror().voice_logs(), json))
    })
    .await?;

    if let Some(ref path) = args.download {
        return download(path, &json, entries.len(), global);
    }

    let rows: Vec<VoiceRow> = entries
        .iter()
        .map(|e| VoiceRow {
            user: e.user.clone(),
            assistant: e.assistant.clone(),
        })
        .collect();
    let rendered = output::render_list(&rows, global.output)?;
    output::print_output(&rendered, global);
    Ok(())
}

fn download(path: &Path, json: &str, count: usize, global: &GlobalOpts) -> Result<(), CliError> {
    std::fs::write(path, json)?;
    if !global.quiet {
        println!("Saved {count} entries to {}", path.display());
    }
    Ok(())
}
