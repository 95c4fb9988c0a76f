//! CLI error type with exit-code mapping.
//!
//! Wraps `CoreError` and `ConfigError` into user-facing messages; every
//! variant maps to a stable process exit code for scripting.

use thiserror::Error;

use wallbridge_config::ConfigError;
use wallbridge_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not reach the wallbox: {0}")]
    Connection(#[source] wallbridge_api::Error),

    #[error("request timed out — check the device address or raise --timeout")]
    Timeout,

    #[error("authentication failed: {message}\nstore the password with: wallbridge config set-password")]
    Auth { message: String },

    #[error("the wallbox rejected the request (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no device data yet — the first poll has not completed")]
    NoData,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Connection(_) => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Auth { .. } | Self::Config(ConfigError::NoPassword { .. }) => exit_code::AUTH,
            Self::Validation { .. } | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(api) => match api {
                wallbridge_api::Error::Timeout => Self::Timeout,
                wallbridge_api::Error::Authentication { message } => Self::Auth { message },
                wallbridge_api::Error::Api { status, message } => Self::Api { status, message },
                other => Self::Connection(other),
            },
            CoreError::Validation { field, reason } => Self::Validation {
                field: field.into(),
                reason,
            },
            CoreError::NoData => Self::NoData,
        }
    }
}
