// Device write commands. Each one syncs the device slice first so the
// idempotence check compares against the hub's actual state, then issues
// the write and reports the settled value.

use haven_core::{FanSpeed, HomeHub, HubConfig, ResourceKind, clamp_target_temp};

use crate::cli::{AcArgs, FanArgs, GlobalOpts, LightArgs};
use crate::error::CliError;

pub async fn light(args: LightArgs, config: HubConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let id = args.room.device_id();
    let on = args.state.is_on();

    HomeHub::oneshot(config, |hub| async move {
        hub.refresh(ResourceKind::Devices).await?;
        hub.set_power(id, on).await
    })
    .await?;

    confirm(
        &format!("{id} switched {}", if on { "on" } else { "off" }),
        global,
    );
    Ok(())
}

pub async fn ac(args: AcArgs, config: HubConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let target = clamp_target_temp(args.temp);
    if i64::from(target) != args.temp {
        tracing::info!(requested = args.temp, target, "AC setpoint clamped");
    }

    let temp = args.temp;
    HomeHub::oneshot(config, |hub| async move {
        hub.refresh(ResourceKind::Devices).await?;
        hub.set_ac_temperature(temp).await
    })
    .await?;

    confirm(&format!("AC set to {target} °C"), global);
    Ok(())
}

pub async fn fan(args: FanArgs, config: HubConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let speed = FanSpeed::from_level(args.level);
    if i64::from(speed.level()) != args.level {
        tracing::info!(requested = args.level, level = speed.level(), "fan speed clamped");
    }

    let level = args.level;
    HomeHub::oneshot(config, |hub| async move {
        hub.refresh(ResourceKind::Devices).await?;
        hub.set_fan_speed(level).await
    })
    .await?;

    confirm(&format!("fan set to speed {}", speed.level()), global);
    Ok(())
}

fn confirm(message: &str, global: &GlobalOpts) {
    if !global.quiet {
        println!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{PowerState, Room};
    use haven_core::DeviceId;

    #[test]
    fn room_and_state_resolve() {
        let args = LightArgs {
            room: Room::Kitchen,
            state: PowerState::On,
        };
        assert_eq!(args.room.device_id(), DeviceId::Kitchen);
        assert!(args.state.is_on());
    }
}
