//! Command handlers and dispatch.

pub mod config_cmd;
pub mod control;
pub mod status;
pub mod watch;

use wallbridge_core::Coordinator;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Connect for a one-shot command: login plus a single refresh, no
/// background polling.
async fn connect_once(global: &GlobalOpts) -> Result<Coordinator, CliError> {
    let coordinator_config = config::coordinator_config(global)?.without_polling();
    tracing::debug!(host = %coordinator_config.host, "connecting");
    let coordinator = Coordinator::new(coordinator_config)?;
    coordinator.connect().await?;
    Ok(coordinator)
}

pub async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;
    let global = &global;
    match command {
        // Config commands never touch the device.
        Command::Config(args) => config_cmd::handle(args, global),

        Command::Watch(args) => watch::handle(args, global).await,

        Command::Status => {
            let coordinator = connect_once(global).await?;
            status::handle(&coordinator, global)
        }
        Command::SetCurrent(args) => {
            let coordinator = connect_once(global).await?;
            control::set_current(&coordinator, args, global).await
        }
        Command::Lock(args) => {
            let coordinator = connect_once(global).await?;
            control::lock(&coordinator, args, true, global).await
        }
        Command::Unlock(args) => {
            let coordinator = connect_once(global).await?;
            control::lock(&coordinator, args, false, global).await
        }
        Command::Led(args) => {
            let coordinator = connect_once(global).await?;
            control::led(&coordinator, args, global).await
        }
    }
}
