//! Write command handlers: `set-current`, `lock`/`unlock`, `led`.
//!
//! Each write goes through the coordinator, which validates locally and
//! re-polls after a successful call; the confirmation printed here is the
//! value the device actually committed, not the one we asked for.

use wallbridge_core::{Command, Coordinator, CurrentTarget, LedMode, Side};

use crate::cli::{GlobalOpts, LedArgs, LockArgs, SetCurrentArgs};
use crate::error::CliError;
use crate::output;

pub async fn set_current(
    coordinator: &Coordinator,
    args: SetCurrentArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let target = match args.side {
        Some(side) => CurrentTarget::PerSide(side.into()),
        None => CurrentTarget::Total,
    };
    coordinator
        .execute(Command::SetCurrentLimit {
            target,
            amps: args.amps,
        })
        .await?;

    let snapshot = coordinator.snapshot().ok_or(CliError::NoData)?;
    let committed = match target {
        CurrentTarget::Total => snapshot.state.max_current_total_a,
        CurrentTarget::PerSide(side) => snapshot.state.side(side).max_current_a,
    };
    let label = match target {
        CurrentTarget::Total => "total".into(),
        CurrentTarget::PerSide(side) => format!("side {}", side.to_string().to_uppercase()),
    };
    let note = if committed == args.amps {
        String::new()
    } else {
        format!(" (requested {} A, device clamped)", args.amps)
    };
    output::print_output(
        &format!("{label} current limit now {committed} A{note}"),
        global.quiet,
    );
    Ok(())
}

pub async fn lock(
    coordinator: &Coordinator,
    args: LockArgs,
    locked: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let side: Side = args.side.into();
    coordinator.execute(Command::SetLock { side, locked }).await?;

    let snapshot = coordinator.snapshot().ok_or(CliError::NoData)?;
    let confirmed = snapshot
        .lock_status
        .as_ref()
        .map_or_else(|| "unknown".into(), |lock| lock.side(side).state.to_string());
    output::print_output(
        &format!("side {} cable now {confirmed}", side.to_string().to_uppercase()),
        global.quiet,
    );
    Ok(())
}

pub async fn led(
    coordinator: &Coordinator,
    args: LedArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(mode) = args.mode {
        let mode: LedMode = mode.into();
        coordinator.execute(Command::SetLedMode(mode)).await?;
    }

    let snapshot = coordinator.snapshot().ok_or(CliError::NoData)?;
    let current = snapshot
        .led_mode
        .map_or_else(|| "unsupported".into(), |mode| mode.to_string());
    output::print_output(&format!("led mode {current}"), global.quiet);
    Ok(())
}
