//! `watch` command handler: subscribe and re-render on every change.

use std::time::Duration;

use wallbridge_core::Coordinator;

use crate::cli::{GlobalOpts, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut coordinator_config = config::coordinator_config(global)?;
    if let Some(secs) = args.interval {
        coordinator_config.poll_interval = Duration::from_secs(secs);
    }

    let coordinator = Coordinator::new(coordinator_config)?;
    coordinator.connect().await?;

    let color = output::should_color(global.color);
    let mut rx = coordinator.subscribe();

    // Initial render, then one render per change notification.
    loop {
        if let Some(snapshot) = rx.borrow_and_update().clone() {
            let out = output::render_snapshot(global.output, &snapshot, color);
            output::print_output(&out, global.quiet);
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break; // coordinator dropped
                }
            }
        }
    }

    coordinator.shutdown().await;
    Ok(())
}
