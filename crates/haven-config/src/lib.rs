//! Configuration for the haven CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `haven_core::HubConfig`. The hub base URL always
//! comes from here or from a CLI flag — nothing is hard-coded.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use haven_core::{HubConfig, PollIntervals};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("no profile named '{profile}' in config")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named hub profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}

/// A named hub profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Hub base URL (e.g., "http://192.168.8.191:8000").
    pub hub: String,

    /// Login username.
    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env).
    pub password: Option<String>,

    /// Environment variable name holding the password.
    pub password_env: Option<String>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Override poll intervals (seconds) per resource kind.
    #[serde(default)]
    pub intervals: IntervalOverrides,
}

/// Per-kind poll interval overrides, in seconds. Unset kinds keep the
/// built-in cadence.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct IntervalOverrides {
    pub sensors: Option<u64>,
    pub devices: Option<u64>,
    pub system_logs: Option<u64>,
    pub voice_logs: Option<u64>,
    pub forecast: Option<u64>,
}

impl IntervalOverrides {
    fn apply(&self, mut base: PollIntervals) -> PollIntervals {
        if let Some(s) = self.sensors {
            base.sensors = Duration::from_secs(s);
        }
        if let Some(s) = self.devices {
            base.devices = Duration::from_secs(s);
        }
        if let Some(s) = self.system_logs {
            base.system_logs = Duration::from_secs(s);
        }
        if let Some(s) = self.voice_logs {
            base.voice_logs = Duration::from_secs(s);
        }
        if let Some(s) = self.forecast {
            base.forecast = Duration::from_secs(s);
        }
        base
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "haven", "haven").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("haven");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("HAVEN_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a password from the credential chain (no CLI prompt step —
/// the CLI adds `rpassword` on top when this fails).
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(profile, profile_name, |var| std::env::var(var).ok(), |name| {
        keyring::Entry::new("haven", &format!("{name}/password"))
            .ok()
            .and_then(|entry| entry.get_password().ok())
    })
}

/// The chain itself, with env and keyring lookups injected so tests can
/// run isolated from the real machine state.
fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env, then the fixed HAVEN_PASSWORD variable
    if let Some(ref env_name) = profile.password_env {
        if let Some(val) = env(env_name) {
            return Ok(SecretString::from(val));
        }
    }
    if let Some(val) = env("HAVEN_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if let Some(secret) = keyring(profile_name) {
        return Ok(SecretString::from(secret));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a password in the system keyring for a profile.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new("haven", &format!("{profile_name}/password")).map_err(|e| {
        ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        }
    })?;
    entry
        .set_password(password)
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── HubConfig construction ──────────────────────────────────────────

/// Build a `HubConfig` from a profile, resolving the password through
/// the credential chain.
pub fn profile_to_hub_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<HubConfig, ConfigError> {
    let password = resolve_password(profile, profile_name)?;
    profile_to_hub_config_with_password(profile, password)
}

/// Build a `HubConfig` from a profile with an already-resolved password
/// (e.g. one prompted interactively).
pub fn profile_to_hub_config_with_password(
    profile: &Profile,
    password: SecretString,
) -> Result<HubConfig, ConfigError> {
    let url: url::Url = profile.hub.parse().map_err(|_| ConfigError::Validation {
        field: "hub".into(),
        reason: format!("invalid URL: {}", profile.hub),
    })?;

    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("HAVEN_USERNAME").ok())
        .ok_or_else(|| ConfigError::Validation {
            field: "username".into(),
            reason: "no username configured".into(),
        })?;

    let mut config = HubConfig::new(url, username, password);
    if let Some(secs) = profile.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    config.intervals = profile.intervals.apply(config.intervals);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(hub: &str) -> Profile {
        Profile {
            hub: hub.into(),
            username: Some("alice".into()),
            password: Some("hunter2".into()),
            ..Profile::default()
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn no_keyring(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        let p = profile("http://hub.local:8000");
        let secret = resolve_password_with(&p, "default", no_env, no_keyring).unwrap();
        use secrecy::ExposeSecret;
        assert_eq!(secret.expose_secret(), "hunter2");
    }

    #[test]
    fn env_password_beats_plaintext() {
        let p = profile("http://hub.local:8000");
        let env = |var: &str| (var == "HAVEN_PASSWORD").then(|| "from-env".to_owned());
        let secret = resolve_password_with(&p, "default", env, no_keyring).unwrap();
        use secrecy::ExposeSecret;
        assert_eq!(secret.expose_secret(), "from-env");
    }

    #[test]
    fn keyring_password_beats_plaintext() {
        let p = profile("http://hub.local:8000");
        let keyring = |name: &str| (name == "default").then(|| "from-keyring".to_owned());
        let secret = resolve_password_with(&p, "default", no_env, keyring).unwrap();
        use secrecy::ExposeSecret;
        assert_eq!(secret.expose_secret(), "from-keyring");
    }

    #[test]
    fn missing_password_is_an_error() {
        let p = Profile {
            hub: "http://hub.local:8000".into(),
            username: Some("alice".into()),
            ..Profile::default()
        };
        assert!(matches!(
            resolve_password_with(&p, "default", no_env, no_keyring),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn invalid_hub_url_is_rejected() {
        let p = profile("not a url");
        assert!(matches!(
            profile_to_hub_config(&p, "default"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn interval_overrides_apply_selectively() {
        let mut p = profile("http://hub.local:8000");
        p.intervals.sensors = Some(1);
        let config = profile_to_hub_config(&p, "default").unwrap();
        assert_eq!(config.intervals.sensors, Duration::from_secs(1));
        assert_eq!(config.intervals.devices, Duration::from_secs(3));
    }
}
