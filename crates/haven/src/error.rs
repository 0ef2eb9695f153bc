use miette::Diagnostic;
use thiserror::Error;

use haven_core::CoreError;

/// Exit codes, stable across releases so scripts can branch on them.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const WRITE_REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("authentication failed: {message}")]
    #[diagnostic(
        code(haven::auth_failed),
        help("check the username and password for this profile; `haven config set-password` updates the keyring")
    )]
    AuthFailed { message: String },

    #[error("no credentials available for profile '{profile}'")]
    #[diagnostic(
        code(haven::no_credentials),
        help("set HAVEN_PASSWORD, store one with `haven config set-password`, or run interactively")
    )]
    NoCredentials { profile: String },

    #[error("no hub configured")]
    #[diagnostic(
        code(haven::no_hub),
        help("pass --hub, set HAVEN_HUB, or run `haven config init`")
    )]
    NoHub,

    #[error("unknown profile '{profile}'")]
    #[diagnostic(code(haven::unknown_profile), help("`haven config show` lists profiles"))]
    UnknownProfile { profile: String },

    #[error("could not reach the hub: {message}")]
    #[diagnostic(
        code(haven::connection_failed),
        help("check the hub URL and that the hub is running")
    )]
    ConnectionFailed { message: String },

    #[error("request timed out")]
    #[diagnostic(code(haven::timeout), help("the hub may be overloaded; try --timeout"))]
    Timeout,

    #[error("the hub rejected the {device} command")]
    #[diagnostic(code(haven::write_rejected))]
    WriteRejected {
        device: &'static str,
        #[source]
        source: CoreError,
    },

    #[error("hub error: {message}")]
    #[diagnostic(code(haven::api_error))]
    ApiError { message: String },

    #[error("invalid {field}: {reason}")]
    #[diagnostic(code(haven::validation))]
    Validation { field: String, reason: String },

    #[error("config error: {0}")]
    #[diagnostic(code(haven::config))]
    Config(#[from] haven_config::ConfigError),

    #[error("IO error: {0}")]
    #[diagnostic(code(haven::io))]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    #[diagnostic(code(haven::serialize))]
    Serialize(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NoHub | Self::UnknownProfile { .. } | Self::Validation { .. } => {
                exit_code::USAGE
            }
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::WriteRejected { .. } => exit_code::WRITE_REJECTED,
            Self::ApiError { .. } | Self::Config(_) | Self::Io(_) | Self::Serialize(_) => {
                exit_code::GENERAL
            }
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Disconnected => Self::ConnectionFailed {
                message: "not connected".into(),
            },
            CoreError::WriteRejected { device, source } => Self::WriteRejected {
                device,
                source: CoreError::Api(source),
            },
            CoreError::Api(api) => match api {
                haven_api::Error::Authentication { message } => Self::AuthFailed { message },
                haven_api::Error::Transport(e) if e.is_timeout() => Self::Timeout,
                haven_api::Error::Transport(e) => Self::ConnectionFailed {
                    message: e.to_string(),
                },
                haven_api::Error::InvalidUrl(e) => Self::Validation {
                    field: "hub".into(),
                    reason: e.to_string(),
                },
                other => Self::ApiError {
                    message: other.to_string(),
                },
            },
            CoreError::Serialize(e) => Self::Serialize(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_exit_with_auth_code() {
        let err = CliError::AuthFailed {
            message: "bad password".into(),
        };
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn core_auth_failure_maps_to_auth() {
        let err = CliError::from(CoreError::AuthenticationFailed {
            message: "nope".into(),
        });
        assert!(matches!(err, CliError::AuthFailed { .. }));
    }

    #[test]
    fn write_rejection_keeps_device_label() {
        let core = CoreError::WriteRejected {
            device: "AC",
            source: haven_api::Error::Rejected {
                status: 500,
                message: "boom".into(),
            },
        };
        let err = CliError::from(core);
        assert_eq!(err.exit_code(), exit_code::WRITE_REJECTED);
        assert!(err.to_string().contains("AC"));
    }
}
