// ── Immutable device snapshot ──
//
// One fully-formed record per successful poll, replaced atomically through
// the coordinator's watch channel. Consumers only ever hold `Arc<Snapshot>`
// and never mutate it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{LedMode, LockStatus, WallboxState};

/// The coordinator's cached view of the device.
///
/// When `available` is false the data fields still hold the last
/// successfully read values; consumers should render them as stale rather
/// than blank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: WallboxState,
    /// Present only on devices with cable-lock support.
    pub lock_status: Option<LockStatus>,
    /// Present only on devices with a controllable status LED.
    pub led_mode: Option<LedMode>,
    /// False after the failure threshold was crossed; values are then stale.
    pub available: bool,
    /// Instant of the poll that produced the data fields.
    pub last_success: DateTime<Utc>,
}

impl Snapshot {
    /// Field-wise equality for notification gating.
    ///
    /// Ignores `last_success`: a poll that returns byte-identical data only
    /// moves the timestamp and must not wake subscribers again.
    pub fn same_data(&self, other: &Self) -> bool {
        self.available == other.available
            && self.state == other.state
            && self.lock_status == other.lock_status
            && self.led_mode == other.led_mode
    }

    /// Copy of this snapshot flagged stale, with all values retained.
    pub(crate) fn as_unavailable(&self) -> Self {
        Self {
            available: false,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::model::{ChargePoint, ChargePointStatus};

    fn snapshot() -> Snapshot {
        let point = ChargePoint {
            status: ChargePointStatus::Charging,
            max_current_a: 16,
            current_a: 16,
            power_w: Some(3680.0),
            energy_kwh: Some(12.4),
        };
        Snapshot {
            state: WallboxState {
                device_id: "WB-1".into(),
                software_version: "1.13".into(),
                hardware_revision: 2,
                initialized: true,
                charge_points: 2,
                error_code: 0,
                uptime: Duration::from_secs(3600),
                max_current_total_a: 20,
                input_lead_limit_a: 25,
                per_side_limit_a: 16,
                side_a: point.clone(),
                side_b: ChargePoint {
                    status: ChargePointStatus::Disconnected,
                    ..point
                },
                supports_metering: true,
                supports_lock: false,
                supports_led: false,
                supports_rfid: false,
                controller_temperature_c: 31.5,
                box_temperature_c: None,
            },
            lock_status: None,
            led_mode: None,
            available: true,
            last_success: Utc::now(),
        }
    }

    #[test]
    fn same_data_ignores_timestamp() {
        let a = snapshot();
        let mut b = a.clone();
        b.last_success = a.last_success + chrono::TimeDelta::seconds(15);
        assert!(a.same_data(&b));
    }

    #[test]
    fn same_data_sees_availability_flips() {
        let a = snapshot();
        let b = a.as_unavailable();
        assert!(!a.same_data(&b));
        assert_eq!(b.state, a.state);
    }

    #[test]
    fn same_data_sees_field_changes() {
        let a = snapshot();
        let mut b = a.clone();
        b.state.side_a.energy_kwh = Some(12.6);
        assert!(!a.same_data(&b));
    }
}
