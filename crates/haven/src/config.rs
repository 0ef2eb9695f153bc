// Resolve CLI flags + config file + environment into a HubConfig.

use std::io::IsTerminal;
use std::time::Duration;

use secrecy::SecretString;

use haven_config::{Config, ConfigError, Profile};
use haven_core::HubConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The profile name in effect: `--profile` beats the config default.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".to_owned())
}

/// Build the hub connection config. Flags override the profile; a
/// missing password falls back to an interactive prompt when stdin is a
/// terminal.
pub fn build_hub_config(global: &GlobalOpts) -> Result<HubConfig, CliError> {
    let config = haven_config::load_config_or_default();
    let profile_name = active_profile_name(global, &config);

    let mut profile = match config.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        // No config file is fine as long as --hub / HAVEN_HUB is given.
        None if global.hub.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            return Err(CliError::UnknownProfile {
                profile: profile_name,
            });
        }
        None => return Err(CliError::NoHub),
    };

    if let Some(ref hub) = global.hub {
        profile.hub = hub.clone();
    }
    if profile.hub.is_empty() {
        return Err(CliError::NoHub);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let password = match haven_config::resolve_password(&profile, &profile_name) {
        Ok(secret) => secret,
        Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
            prompt_password(&profile_name)?
        }
        Err(ConfigError::NoCredentials { .. }) => {
            return Err(CliError::NoCredentials {
                profile: profile_name,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let mut hub_config = haven_config::profile_to_hub_config_with_password(&profile, password)?;
    if let Some(timeout) = global.timeout {
        hub_config.timeout = Duration::from_secs(timeout);
    }
    Ok(hub_config)
}

fn prompt_password(profile_name: &str) -> Result<SecretString, CliError> {
    let prompt = format!("Password for profile '{profile_name}': ");
    let password = rpassword::prompt_password(prompt)?;
    Ok(SecretString::from(password))
}
