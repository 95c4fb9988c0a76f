//! Resolution of CLI flags + config file into a `CoordinatorConfig`.

use std::time::Duration;

use secrecy::SecretString;

use wallbridge_config as cfg;
use wallbridge_core::CoordinatorConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a coordinator config from the config file, the selected wallbox,
/// and CLI flag overrides.
///
/// `--host` bypasses the config file entirely; the password then has to
/// come from `WALLBRIDGE_PASSWORD`.
pub fn coordinator_config(global: &GlobalOpts) -> Result<CoordinatorConfig, CliError> {
    let mut config = if let Some(ref host) = global.host {
        let password = std::env::var("WALLBRIDGE_PASSWORD")
            .map(SecretString::from)
            .map_err(|_| cfg::ConfigError::NoPassword {
                name: host.clone(),
            })?;
        CoordinatorConfig::new(host.clone(), password)
    } else {
        let file = cfg::load_config_or_default();
        let (name, profile) = file.select_wallbox(global.wallbox.as_deref())?;
        cfg::profile_to_coordinator_config(profile, name, &file.defaults)?
    };

    if let Some(timeout) = global.timeout {
        config.request_timeout = Duration::from_secs(timeout);
    }
    Ok(config)
}
