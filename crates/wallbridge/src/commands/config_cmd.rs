//! `config` command handlers.

use std::io::{BufRead, Write};

use wallbridge_config as cfg;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let config = cfg::load_config_or_default();
            let out = if global.output == OutputFormat::Json {
                output::render_json(&config)
            } else {
                toml::to_string_pretty(&config).map_err(cfg::ConfigError::Serialization)?
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&cfg::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut config = cfg::load_config()?;
            if !config.wallboxes.contains_key(&name) {
                return Err(cfg::ConfigError::UnknownWallbox { name }.into());
            }
            config.default_wallbox = Some(name.clone());
            cfg::save_config(&config)?;
            output::print_output(&format!("default wallbox set to '{name}'"), global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword { wallbox } => {
            let config = cfg::load_config_or_default();
            let name = match wallbox.as_deref().or_else(|| global.wallbox.as_deref()) {
                Some(name) => name.to_owned(),
                None => config.select_wallbox(None)?.0.to_owned(),
            };

            let password = prompt_password(&name)?;
            cfg::store_password(&name, &password).map_err(|err| CliError::Auth {
                message: format!("keyring rejected the password: {err}"),
            })?;
            output::print_output(
                &format!("password for '{name}' stored in the system keyring"),
                global.quiet,
            );
            Ok(())
        }
    }
}

fn prompt_password(name: &str) -> Result<String, CliError> {
    let mut stderr = std::io::stderr().lock();
    write!(stderr, "Password for wallbox '{name}': ")?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}
