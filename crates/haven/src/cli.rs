use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use haven_core::DeviceId;

/// Control a haven home-automation hub from the command line.
#[derive(Debug, Parser)]
#[command(name = "haven", version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(short, long, global = true, env = "HAVEN_PROFILE")]
    pub profile: Option<String>,

    /// Hub base URL (overrides the profile)
    #[arg(short = 'H', long, global = true, env = "HAVEN_HUB")]
    pub hub: Option<String>,

    /// Login username (overrides the profile)
    #[arg(short, long, global = true, env = "HAVEN_USERNAME")]
    pub username: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    pub output: OutputFormat,

    /// Color output control
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain lines, one record per line
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current sensor readings
    Status,

    /// Device operations
    #[command(subcommand)]
    Devices(DevicesCommand),

    /// Switch a room light on or off
    Light(LightArgs),

    /// Set the AC target temperature (°C)
    Ac(AcArgs),

    /// Set the fan speed (1–3)
    Fan(FanArgs),

    /// Show the 5-hour temperature forecast
    Forecast,

    /// Show system logs
    Logs(LogsArgs),

    /// Show voice assistant logs
    Voice(LogsArgs),

    /// Register a timed AC/fan program
    Schedule(ScheduleArgs),

    /// Print the camera stream URL
    Camera,

    /// Watch live hub state, re-rendering as it changes
    Watch(WatchArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List all devices with their current state
    List,
}

#[derive(Debug, Args)]
pub struct LightArgs {
    /// Which room's light
    pub room: Room,

    /// Desired state
    pub state: PowerState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Room {
    Kitchen,
    Livingroom,
    Bedroom,
}

impl Room {
    pub fn device_id(self) -> DeviceId {
        match self {
            Self::Kitchen => DeviceId::Kitchen,
            Self::Livingroom => DeviceId::LivingRoom,
            Self::Bedroom => DeviceId::Bedroom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

#[derive(Debug, Args)]
pub struct AcArgs {
    /// Target temperature in °C (out-of-range values are clamped to 16–32)
    pub temp: i64,
}

#[derive(Debug, Args)]
pub struct FanArgs {
    /// Speed level (out-of-range values are clamped to 1–3)
    pub level: i64,
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Write the log snapshot to a JSON file instead of rendering it
    #[arg(long, value_name = "FILE")]
    pub download: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    /// Program start (RFC 3339, e.g. 2026-08-25T18:00:00Z)
    #[arg(long, value_parser = parse_utc)]
    pub start: chrono::DateTime<chrono::Utc>,

    /// Program end (RFC 3339)
    #[arg(long, value_parser = parse_utc)]
    pub end: chrono::DateTime<chrono::Utc>,

    /// AC target temperature during the program
    #[arg(long, default_value_t = 24)]
    pub ac_temp: i64,

    /// Fan speed during the program
    #[arg(long, default_value_t = 1)]
    pub fan_speed: i64,
}

fn parse_utc(s: &str) -> Result<chrono::DateTime<chrono::Utc>, String> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| format!("not an RFC 3339 timestamp: {e}"))
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Re-render at most this often, in seconds
    #[arg(long, default_value_t = 1)]
    pub interval: u64,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a starter config file
    Init(ConfigInitArgs),

    /// Show the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Store a profile password in the system keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct ConfigInitArgs {
    /// Hub base URL for the new profile
    #[arg(long)]
    pub hub: Option<String>,

    /// Username for the new profile
    #[arg(long)]
    pub username: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rooms_map_to_device_ids() {
        assert_eq!(Room::Kitchen.device_id(), DeviceId::Kitchen);
        assert_eq!(Room::Livingroom.device_id(), DeviceId::LivingRoom);
        assert_eq!(Room::Bedroom.device_id(), DeviceId::Bedroom);
    }

    #[test]
    fn schedule_times_parse_rfc3339() {
        let cli = Cli::parse_from([
            "haven",
            "schedule",
            "--start",
            "2026-08-25T18:00:00Z",
            "--end",
            "2026-08-25T20:00:00Z",
            "--ac-temp",
            "22",
        ]);
        match cli.command {
            Command::Schedule(args) => {
                assert!(args.end > args.start);
                assert_eq!(args.ac_temp, 22);
                assert_eq!(args.fan_speed, 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
