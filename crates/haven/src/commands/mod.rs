pub mod camera;
pub mod config_cmd;
pub mod control;
pub mod devices;
pub mod forecast;
pub mod logs;
pub mod schedule;
pub mod status;
pub mod watch;

use haven_core::HubConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(
    command: Command,
    config: HubConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        Command::Status => status::handle(config, global).await,
        Command::Devices(cmd) => devices::handle(cmd, config, global).await,
        Command::Light(args) => control::light(args, config, global).await,
        Command::Ac(args) => control::ac(args, config, global).await,
        Command::Fan(args) => control::fan(args, config, global).await,
        Command::Forecast => forecast::handle(config, global).await,
        Command::Logs(args) => logs::system(args, config, global).await,
        Command::Voice(args) => logs::voice(args, config, global).await,
        Command::Schedule(args) => schedule::handle(args, config, global).await,
        Command::Camera => camera::handle(config),
        Command::Watch(args) => watch::handle(args, config, global).await,

        // Handled before a hub config is resolved.
        Command::Config(_) | Command::Completions(_) => unreachable!("dispatched in main"),
    }
}
