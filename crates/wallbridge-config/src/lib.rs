//! Shared configuration for the wallbridge CLI.
//!
//! TOML profiles ("wallboxes"), password resolution (env + keyring +
//! plaintext), and translation to `wallbridge_core::CoordinatorConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wallbridge_core::CoordinatorConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no wallbox named '{name}' is configured")]
    UnknownWallbox { name: String },

    #[error("no wallbox configured; add one to {path}")]
    NoWallboxes { path: PathBuf },

    #[error("no password configured for wallbox '{name}'")]
    NoPassword { name: String },

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
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Wallbox used when no `--wallbox` flag is given.
    pub default_wallbox: Option<String>,

    /// Global defaults, overridable per wallbox.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named wallbox profiles.
    #[serde(default)]
    pub wallboxes: HashMap<String, WallboxProfile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Poll period for `watch`, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// HTTP request deadline, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            poll_interval: default_poll_interval(),
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
fn default_poll_interval() -> u64 {
    wallbridge_core::config::DEFAULT_POLL_INTERVAL.as_secs()
}
fn default_timeout() -> u64 {
    wallbridge_core::config::DEFAULT_REQUEST_TIMEOUT.as_secs()
}

/// A named wallbox profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct WallboxProfile {
    /// Device address: IP or hostname, optionally with a scheme.
    pub host: String,

    /// Device password (plaintext — prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override poll interval, in seconds. `0` disables background polling.
    pub poll_interval: Option<u64>,

    /// Override the consecutive-failure threshold.
    pub failure_threshold: Option<u32>,

    /// Override timeout, in seconds.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "wallbridge", "wallbridge").map_or_else(
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
    p.push("wallbridge");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full `Config` from file + environment.
///
/// Environment variables use the `WALLBRIDGE_` prefix with `_` as the
/// nesting separator (`WALLBRIDGE_DEFAULTS_OUTPUT=json`).
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a `Config` from an explicit file path (used by `--config`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WALLBRIDGE_").split("_"));

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

// ── Profile selection ───────────────────────────────────────────────

impl Config {
    /// Select a wallbox by explicit name, falling back to the configured
    /// default, falling back to a sole configured entry.
    pub fn select_wallbox(&self, name: Option<&str>) -> Result<(&str, &WallboxProfile), ConfigError> {
        let chosen = name
            .map(str::to_owned)
            .or_else(|| self.default_wallbox.clone())
            .or_else(|| {
                if self.wallboxes.len() == 1 {
                    self.wallboxes.keys().next().cloned()
                } else {
                    None
                }
            })
            .ok_or_else(|| ConfigError::NoWallboxes {
                path: config_path(),
            })?;

        self.wallboxes
            .get_key_value(chosen.as_str())
            .map(|(k, v)| (k.as_str(), v))
            .ok_or(ConfigError::UnknownWallbox { name: chosen })
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a wallbox password from the credential chain.
///
/// Order: profile's `password_env` variable, then `WALLBRIDGE_PASSWORD`,
/// then the system keyring (`wallbridge` service, `<name>/password` entry),
/// then plaintext in the config file.
pub fn resolve_password(
    profile: &WallboxProfile,
    name: &str,
) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var("WALLBRIDGE_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    if let Ok(entry) = keyring::Entry::new("wallbridge", &format!("{name}/password")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoPassword { name: name.into() })
}

/// Store a wallbox password in the system keyring.
pub fn store_password(name: &str, password: &str) -> Result<(), keyring::Error> {
    keyring::Entry::new("wallbridge", &format!("{name}/password"))?.set_password(password)
}

// ── Coordinator config ──────────────────────────────────────────────

/// Build a `CoordinatorConfig` from a profile, applying global defaults
/// where the profile has no override.
pub fn profile_to_coordinator_config(
    profile: &WallboxProfile,
    name: &str,
    defaults: &Defaults,
) -> Result<CoordinatorConfig, ConfigError> {
    let password = resolve_password(profile, name)?;

    let mut config = CoordinatorConfig::new(profile.host.clone(), password);
    config.poll_interval =
        Duration::from_secs(profile.poll_interval.unwrap_or(defaults.poll_interval));
    config.request_timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    if let Some(threshold) = profile.failure_threshold {
        config.failure_threshold = threshold;
    }
    Ok(config)
}
