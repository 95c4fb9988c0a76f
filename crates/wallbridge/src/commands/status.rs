//! `status` command handler.

use wallbridge_core::Coordinator;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    // connect() already performed the refresh; a missing snapshot here
    // means it was skipped, which connect() treats as an error.
    let snapshot = coordinator.snapshot().ok_or(CliError::NoData)?;

    let color = output::should_color(global.color);
    let out = output::render_snapshot(global.output, &snapshot, color);
    output::print_output(&out, global.quiet);
    Ok(())
}
