//! Wire-level request and response types for the wallbox API.
//!
//! These mirror the device's JSON shapes exactly (PascalCase keys, numeric
//! pseudo-booleans, sentinel values). Conversion into ergonomic domain
//! types happens in `wallbridge-core`; this module stays faithful to the
//! firmware so protocol changes are visible in one place.

use serde::{Deserialize, Deserializer, Serialize};

/// `POST /api/v1/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "AuthKey")]
    pub auth_key: String,
}

/// Bulk status report from `GET /api/v1/all`.
///
/// Every field is defaulted: firmware revisions differ in which keys they
/// emit, and the device treats a missing key as "feature absent", not as an
/// error. Missing *required* semantics are enforced in the core layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StatusReport {
    pub device_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub software_version: String,
    pub hardware_revision: u32,
    /// 0/1 pseudo-boolean.
    pub system_initialized: u8,
    /// Firmware quirk: `0` means the box has two charge points, `1` means one.
    pub num_charging_points: u8,
    pub error_code: u32,
    /// Milliseconds since the controller booted.
    pub uptime: u64,

    pub max_current_total: u8,
    pub max_current_car1: u8,
    pub max_current_car2: u8,
    /// Device-declared upper bound for the per-car limits.
    pub max_current_per_side: u8,
    /// Upper bound for the total limit, set by the installer's input lead.
    pub current_setting_input_lead: u8,

    pub current_car1: u8,
    pub current_car2: u8,
    pub power_car1: f64,
    pub power_car2: f64,
    pub status_car1: u8,
    pub status_car2: u8,

    pub current_meas_support: u8,
    /// 0/1 pseudo-boolean.
    pub support_lock_unlock: u8,
    /// 0/1 pseudo-boolean.
    pub led_support: u8,
    /// 0/1 pseudo-boolean.
    pub rfid_supported: u8,

    pub comm_pcb_temperature: f64,
    /// `255` is the firmware's "no probe fitted" sentinel.
    pub box_temperature: f64,

    pub energy_car1: Option<f64>,
    pub energy_car2: Option<f64>,

    pub sw_version_main_pcb: u32,
    #[serde(rename = "SwVersionModbusRfidModule")]
    pub sw_version_modbus_rfid: u32,
}

/// Lock and timer status from `GET /api/v1/lock_status`.
///
/// Statuses are free-form firmware strings; the core layer maps `"Locked"`
/// and treats anything else as unlocked, matching device behavior.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LockReport {
    pub lock_status1: String,
    pub lock_status2: String,
    pub timer_status1: String,
    pub timer_remaining_time1: u32,
    pub timer_status2: String,
    pub timer_remaining_time2: u32,
    pub power_status1: String,
    pub timer_remaining_power1: f64,
    pub power_status2: String,
    pub timer_remaining_power2: f64,
}

/// Body for `POST /api/v1/power`.
///
/// The firmware insists on receiving all three limits in a single request,
/// even when only one changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PowerLimits {
    pub max_current_total: u8,
    pub max_current_car1: u8,
    pub max_current_car2: u8,
}

/// Body for `POST /api/v1/lock`.
#[derive(Debug, Clone, Serialize)]
pub struct LockCommand {
    /// `"lock"` or `"unlock"`.
    pub action: &'static str,
    /// 0 = side A, 1 = side B.
    pub side: u8,
}

/// Body (and response shape) for the LED mode endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedModeBody {
    #[serde(rename = "ledMode", default)]
    pub led_mode: u8,
}

/// Accept either a JSON string or a bare number for version-ish fields —
/// older firmware emits `"SoftwareVersion": 113`, newer emits a string.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
