//! Conversion from wire-level reports into canonical domain types.
//!
//! All firmware quirks are normalized here so the rest of the crate (and
//! consumers) never see them:
//!
//! - `NumChargingPoints == 0` actually means a dual-point device.
//! - Capability flags are 0/1 integers.
//! - `BoxTemperature == 255` means "no probe fitted".
//! - Unknown charge-point status codes degrade to `Disconnected`, matching
//!   the device's own display behavior.

use std::time::Duration;

use wallbridge_api::models::{LockReport, StatusReport};

use crate::model::{
    ChargePoint, ChargePointStatus, LockState, LockStatus, SideLock, WallboxState,
};

/// The firmware's "no temperature probe" sentinel.
const NO_PROBE_SENTINEL: f64 = 255.0;

fn charge_point_status(raw: u8) -> ChargePointStatus {
    match raw {
        1 => ChargePointStatus::Connected,
        2 => ChargePointStatus::Charging,
        3 => ChargePointStatus::ChargingWithCooling,
        4 => ChargePointStatus::Fault,
        _ => ChargePointStatus::Disconnected,
    }
}

fn lock_state(raw: &str) -> LockState {
    if raw == "Locked" {
        LockState::Locked
    } else {
        LockState::Unlocked
    }
}

impl From<StatusReport> for WallboxState {
    fn from(r: StatusReport) -> Self {
        let metering = r.current_meas_support > 0;
        let side_a = ChargePoint {
            status: charge_point_status(r.status_car1),
            max_current_a: r.max_current_car1,
            current_a: r.current_car1,
            power_w: metering.then_some(r.power_car1),
            energy_kwh: r.energy_car1,
        };
        let side_b = ChargePoint {
            status: charge_point_status(r.status_car2),
            max_current_a: r.max_current_car2,
            current_a: r.current_car2,
            power_w: metering.then_some(r.power_car2),
            energy_kwh: r.energy_car2,
        };

        Self {
            device_id: r.device_id,
            software_version: r.software_version,
            hardware_revision: r.hardware_revision,
            initialized: r.system_initialized == 1,
            charge_points: if r.num_charging_points == 0 { 2 } else { 1 },
            error_code: r.error_code,
            uptime: Duration::from_millis(r.uptime),
            max_current_total_a: r.max_current_total,
            input_lead_limit_a: r.current_setting_input_lead,
            per_side_limit_a: r.max_current_per_side,
            side_a,
            side_b,
            supports_metering: metering,
            supports_lock: r.support_lock_unlock == 1,
            supports_led: r.led_support == 1,
            supports_rfid: r.rfid_supported == 1,
            controller_temperature_c: r.comm_pcb_temperature,
            box_temperature_c: ((r.box_temperature - NO_PROBE_SENTINEL).abs() > f64::EPSILON)
                .then_some(r.box_temperature),
        }
    }
}

impl From<LockReport> for LockStatus {
    fn from(r: LockReport) -> Self {
        Self {
            side_a: SideLock {
                state: lock_state(&r.lock_status1),
                timer_status: r.timer_status1,
                timer_remaining_s: r.timer_remaining_time1,
                power_status: r.power_status1,
                power_remaining_kwh: r.timer_remaining_power1,
            },
            side_b: SideLock {
                state: lock_state(&r.lock_status2),
                timer_status: r.timer_status2,
                timer_remaining_s: r.timer_remaining_time2,
                power_status: r.power_status2,
                power_remaining_kwh: r.timer_remaining_power2,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> StatusReport {
        StatusReport {
            device_id: "WB-1".into(),
            num_charging_points: 0,
            status_car1: 2,
            status_car2: 0,
            current_meas_support: 1,
            power_car1: 3680.0,
            energy_car1: Some(12.4),
            box_temperature: 255.0,
            support_lock_unlock: 1,
            ..StatusReport::default()
        }
    }

    #[test]
    fn zero_charging_points_means_dual() {
        let state = WallboxState::from(report());
        assert_eq!(state.charge_points, 2);
        assert!(state.has_side(crate::model::Side::B));

        let single = StatusReport {
            num_charging_points: 1,
            ..report()
        };
        let state = WallboxState::from(single);
        assert_eq!(state.charge_points, 1);
        assert!(!state.has_side(crate::model::Side::B));
    }

    #[test]
    fn temperature_sentinel_becomes_none() {
        let state = WallboxState::from(report());
        assert!(state.box_temperature_c.is_none());

        let with_probe = StatusReport {
            box_temperature: 24.0,
            ..report()
        };
        let state = WallboxState::from(with_probe);
        assert_eq!(state.box_temperature_c, Some(24.0));
    }

    #[test]
    fn metering_gates_power_not_energy() {
        let state = WallboxState::from(report());
        assert_eq!(state.side_a.power_w, Some(3680.0));

        let unmetered = StatusReport {
            current_meas_support: 0,
            ..report()
        };
        let state = WallboxState::from(unmetered);
        assert!(state.side_a.power_w.is_none());
        // Energy presence is driven by the device omitting the key, not by
        // the metering flag.
        assert_eq!(state.side_a.energy_kwh, Some(12.4));
    }

    #[test]
    fn unknown_status_code_degrades_to_disconnected() {
        let weird = StatusReport {
            status_car1: 42,
            ..report()
        };
        let state = WallboxState::from(weird);
        assert_eq!(state.side_a.status, ChargePointStatus::Disconnected);
    }

    #[test]
    fn only_exact_locked_string_counts() {
        let lock = LockStatus::from(LockReport {
            lock_status1: "Locked".into(),
            lock_status2: "locked?".into(),
            ..LockReport::default()
        });
        assert_eq!(lock.side_a.state, LockState::Locked);
        assert_eq!(lock.side_b.state, LockState::Unlocked);
    }
}
