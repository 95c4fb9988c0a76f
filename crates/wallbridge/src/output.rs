//! Output formatting: table, JSON, plain.
//!
//! Table views use `tabled` with a summary header; JSON serializes the
//! snapshot via serde; plain emits `key=value` lines for scripting.

use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use wallbridge_core::{ChargePointStatus, Side, Snapshot};

use crate::cli::{ColorMode, OutputFormat};

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Snapshot rendering ───────────────────────────────────────────────

/// Render a full snapshot in the chosen format.
pub fn render_snapshot(format: OutputFormat, snapshot: &Snapshot, color: bool) -> String {
    match format {
        OutputFormat::Table => render_snapshot_table(snapshot, color),
        OutputFormat::Json => render_json(snapshot),
        OutputFormat::Plain => render_snapshot_plain(snapshot),
    }
}

/// Pretty-printed JSON for any serializable value.
pub fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

#[derive(Tabled)]
struct SideRow {
    #[tabled(rename = "Side")]
    side: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Energy")]
    energy: String,
    #[tabled(rename = "Lock")]
    lock: String,
}

fn status_label(status: ChargePointStatus, color: bool) -> String {
    if !color {
        return status.to_string();
    }
    match status {
        ChargePointStatus::Charging | ChargePointStatus::ChargingWithCooling => {
            status.green().to_string()
        }
        ChargePointStatus::Connected => status.yellow().to_string(),
        ChargePointStatus::Fault => status.red().bold().to_string(),
        ChargePointStatus::Disconnected => status.dimmed().to_string(),
    }
}

fn side_row(snapshot: &Snapshot, side: Side, color: bool) -> SideRow {
    let point = snapshot.state.side(side);
    SideRow {
        side: side.to_string().to_uppercase(),
        status: status_label(point.status, color),
        current: format!("{} A", point.current_a),
        limit: format!("{} A", point.max_current_a),
        power: point
            .power_w
            .map_or_else(|| "-".into(), |w| format!("{w:.0} W")),
        energy: point
            .energy_kwh
            .map_or_else(|| "-".into(), |kwh| format!("{kwh:.1} kWh")),
        lock: snapshot
            .lock_status
            .as_ref()
            .map_or_else(|| "-".into(), |lock| lock.side(side).state.to_string()),
    }
}

fn render_snapshot_table(snapshot: &Snapshot, color: bool) -> String {
    let state = &snapshot.state;
    let mut out = String::new();

    let availability = if snapshot.available {
        if color {
            "available".green().to_string()
        } else {
            "available".into()
        }
    } else if color {
        "STALE".red().bold().to_string()
    } else {
        "STALE".into()
    };

    let _ = writeln!(
        out,
        "{} (firmware {})  {}  last update {}",
        state.device_id,
        state.software_version,
        availability,
        snapshot.last_success.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    let _ = writeln!(
        out,
        "total limit {} A (lead rated {} A)",
        state.max_current_total_a, state.input_lead_limit_a,
    );
    if let Some(mode) = snapshot.led_mode {
        let _ = writeln!(out, "led mode {mode}");
    }
    if let Some(temp) = state.box_temperature_c {
        let _ = writeln!(out, "box temperature {temp:.1} °C");
    }

    let mut rows = vec![side_row(snapshot, Side::A, color)];
    if state.has_side(Side::B) {
        rows.push(side_row(snapshot, Side::B, color));
    }
    let _ = write!(out, "{}", Table::new(rows).with(Style::rounded()));
    out
}

fn render_snapshot_plain(snapshot: &Snapshot) -> String {
    let state = &snapshot.state;
    let mut out = String::new();
    let _ = writeln!(out, "available={}", snapshot.available);
    let _ = writeln!(out, "device_id={}", state.device_id);
    let _ = writeln!(out, "max_current_total_a={}", state.max_current_total_a);
    if let Some(mode) = snapshot.led_mode {
        let _ = writeln!(out, "led_mode={mode}");
    }
    for side in [Side::A, Side::B] {
        if !state.has_side(side) {
            continue;
        }
        let point = state.side(side);
        let _ = writeln!(out, "status_{side}={}", point.status);
        let _ = writeln!(out, "current_{side}_a={}", point.current_a);
        let _ = writeln!(out, "max_current_{side}_a={}", point.max_current_a);
        if let Some(power) = point.power_w {
            let _ = writeln!(out, "power_{side}_w={power}");
        }
        if let Some(energy) = point.energy_kwh {
            let _ = writeln!(out, "energy_{side}_kwh={energy}");
        }
        if let Some(lock) = &snapshot.lock_status {
            let _ = writeln!(out, "lock_{side}={}", lock.side(side).state);
        }
    }
    out.truncate(out.trim_end().len());
    out
}
