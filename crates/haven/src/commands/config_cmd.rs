use haven_config::{Config, ConfigError, Profile};

use crate::cli::{ConfigCommand, ConfigInitArgs, GlobalOpts, OutputFormat};
use crate::config::active_profile_name;
use crate::error::CliError;

pub fn handle(command: ConfigCommand, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        ConfigCommand::Path => {
            println!("{}", haven_config::config_path().display());
            Ok(())
        }
        ConfigCommand::Show => show(global),
        ConfigCommand::Init(args) => init(&args, global),
        ConfigCommand::SetPassword => set_password(global),
    }
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let config = redacted(haven_config::load_config()?);

    let rendered = match global.output {
        OutputFormat::Json => serde_json::to_string_pretty(&config)?,
        OutputFormat::JsonCompact => serde_json::to_string(&config)?,
        OutputFormat::Table | OutputFormat::Plain => {
            toml::to_string_pretty(&config).map_err(ConfigError::from)?
        }
    };
    println!("{rendered}");
    Ok(())
}

fn init(args: &ConfigInitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = haven_config::config_path();
    if path.exists() {
        return Err(CliError::Validation {
            field: "config".into(),
            reason: format!("already exists at {}", path.display()),
        });
    }

    let mut config = Config::default();
    config.profiles.insert(
        "default".to_owned(),
        Profile {
            hub: args
                .hub
                .clone()
                .or_else(|| global.hub.clone())
                .unwrap_or_else(|| "http://hub.local:8000".to_owned()),
            username: args.username.clone().or_else(|| global.username.clone()),
            ..Profile::default()
        },
    );

    haven_config::save_config(&config)?;
    println!("Wrote starter config to {}", path.display());
    println!("Store a password with `haven config set-password`.");
    Ok(())
}

fn set_password(global: &GlobalOpts) -> Result<(), CliError> {
    let config = haven_config::load_config_or_default();
    let profile_name = active_profile_name(global, &config);

    let password = rpassword::prompt_password(format!("Password for profile '{profile_name}': "))?;
    haven_config::store_password(&profile_name, &password)?;
    println!("Password stored in the system keyring for '{profile_name}'.");
    Ok(())
}

/// Plaintext passwords never leave the config file through `show`.
fn redacted(mut config: Config) -> Config {
    for profile in config.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("<redacted>".to_owned());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_redacts_plaintext_passwords() {
        let mut config = Config::default();
        config.profiles.insert(
            "home".into(),
            Profile {
                hub: "http://hub.local:8000".into(),
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );
        let redacted = redacted(config);
        assert_eq!(
            redacted.profiles["home"].password.as_deref(),
            Some("<redacted>")
        );
    }
}
