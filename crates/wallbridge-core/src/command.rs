//! Typed write requests routed through the coordinator.

use crate::model::{LedMode, Side};

/// Which current limit a [`Command::SetCurrentLimit`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentTarget {
    /// The combined limit across both sides, capped by the input lead.
    Total,
    /// The per-side limit for one charge point, capped by the device's
    /// per-side maximum.
    PerSide(Side),
}

/// A validated-then-forwarded write to the device.
///
/// Commands for the same field are serialized by the coordinator; a second
/// command queues behind an in-flight one instead of interleaving with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Change a charging current limit (amps). The device may commit a
    /// clamped value; the confirming refresh picks up whatever it chose.
    SetCurrentLimit { target: CurrentTarget, amps: u8 },
    /// Lock or unlock the cable on one side.
    SetLock { side: Side, locked: bool },
    /// Change the status LED behavior.
    SetLedMode(LedMode),
}

impl Command {
    /// Human-readable field name, used in validation errors and logs.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::SetCurrentLimit {
                target: CurrentTarget::Total,
                ..
            } => "max_current_total",
            Self::SetCurrentLimit {
                target: CurrentTarget::PerSide(Side::A),
                ..
            } => "max_current_side_a",
            Self::SetCurrentLimit {
                target: CurrentTarget::PerSide(Side::B),
                ..
            } => "max_current_side_b",
            Self::SetLock { side: Side::A, .. } => "lock_side_a",
            Self::SetLock { side: Side::B, .. } => "lock_side_b",
            Self::SetLedMode(_) => "led_mode",
        }
    }
}
