use haven_core::{FanSpeed, HomeHub, HubConfig, clamp_target_temp};

use crate::cli::{GlobalOpts, ScheduleArgs};
use crate::error::CliError;

pub async fn handle(
    args: ScheduleArgs,
    config: HubConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.end <= args.start {
        return Err(CliError::Validation {
            field: "end".into(),
            reason: "must be after --start".into(),
        });
    }

    let ScheduleArgs {
        start,
        end,
        ac_temp,
        fan_speed,
    } = args;

    HomeHub::oneshot(config, |hub| async move {
        hub.create_schedule(start, end, ac_temp, fan_speed).await
    })
    .await?;

    if !global.quiet {
        println!(
            "Scheduled {} → {}: AC {} °C, fan speed {}",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M"),
            clamp_target_temp(ac_temp),
            FanSpeed::from_level(fan_speed).level(),
        );
    }
    Ok(())
}
