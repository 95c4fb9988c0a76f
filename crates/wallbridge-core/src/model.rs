//! Canonical domain types for the wallbox.
//!
//! Wire-level quirks (0/1 pseudo-booleans, the inverted charge-point count,
//! temperature sentinels) are resolved in [`crate::convert`]; everything in
//! here is already ergonomic Rust.

use std::time::Duration;

use serde::Serialize;
use strum::{Display, EnumString};

/// Hard lower bound for every current limit, from the charging standard.
pub const MIN_CURRENT_A: u8 = 6;

/// Upper bound used before the device has declared its own limits.
pub const FALLBACK_MAX_CURRENT_A: u8 = 32;

/// One of the two physical charge points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The device's wire index for this side.
    pub fn wire_index(self) -> u8 {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

/// Charging state of one charge point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChargePointStatus {
    Disconnected,
    Connected,
    Charging,
    ChargingWithCooling,
    Fault,
}

impl ChargePointStatus {
    /// True while energy is actually flowing.
    pub fn is_charging(self) -> bool {
        matches!(self, Self::Charging | Self::ChargingWithCooling)
    }
}

/// Behavior of the front status LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LedMode {
    On,
    OnIfRequired,
    Off,
}

impl LedMode {
    /// Decode the wire value, defaulting to `On` for unknown firmware modes.
    pub fn from_wire(raw: u8) -> Self {
        match raw {
            1 => Self::OnIfRequired,
            2 => Self::Off,
            _ => Self::On,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            Self::On => 0,
            Self::OnIfRequired => 1,
            Self::Off => 2,
        }
    }
}

/// Cable lock state of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    Locked,
    Unlocked,
}

/// Telemetry for a single charge point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargePoint {
    pub status: ChargePointStatus,
    /// Configured current limit for this side, in amps.
    pub max_current_a: u8,
    /// Measured charging current, in amps.
    pub current_a: u8,
    /// Measured power draw in watts; `None` without metering hardware.
    pub power_w: Option<f64>,
    /// Session energy counter in kWh; `None` without metering hardware.
    pub energy_kwh: Option<f64>,
}

/// Lock and timer status for one side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideLock {
    pub state: LockState,
    pub timer_status: String,
    pub timer_remaining_s: u32,
    pub power_status: String,
    pub power_remaining_kwh: f64,
}

/// Lock status for both sides, fetched only on devices with lock support.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockStatus {
    pub side_a: SideLock,
    pub side_b: SideLock,
}

impl LockStatus {
    pub fn side(&self, side: Side) -> &SideLock {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }
}

/// Full decoded device state from one bulk status report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WallboxState {
    pub device_id: String,
    pub software_version: String,
    pub hardware_revision: u32,
    pub initialized: bool,
    /// 1 or 2 physical charge points.
    pub charge_points: u8,
    pub error_code: u32,
    /// Time since the controller booted.
    #[serde(with = "duration_secs")]
    pub uptime: Duration,

    /// Total current limit across both sides, in amps.
    pub max_current_total_a: u8,
    /// Installer-declared ceiling for the total limit (input lead rating).
    pub input_lead_limit_a: u8,
    /// Device-declared ceiling for each per-side limit.
    pub per_side_limit_a: u8,

    pub side_a: ChargePoint,
    pub side_b: ChargePoint,

    pub supports_metering: bool,
    pub supports_lock: bool,
    pub supports_led: bool,
    pub supports_rfid: bool,

    /// Controller PCB temperature in °C.
    pub controller_temperature_c: f64,
    /// Enclosure temperature in °C; `None` when no probe is fitted.
    pub box_temperature_c: Option<f64>,
}

impl WallboxState {
    pub fn side(&self, side: Side) -> &ChargePoint {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    /// Whether this device physically has the given side.
    pub fn has_side(&self, side: Side) -> bool {
        match side {
            Side::A => true,
            Side::B => self.charge_points == 2,
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }
}
