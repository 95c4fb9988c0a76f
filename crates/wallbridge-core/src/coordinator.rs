// ── Polling coordinator ──
//
// Owns the snapshot, runs the poll cycle, applies the availability state
// machine, and routes validated writes to the device. Single writer
// (this type), many readers (watch subscribers).

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use wallbridge_api::models::PowerLimits;
use wallbridge_api::WallboxClient;

use crate::command::{Command, CurrentTarget};
use crate::config::CoordinatorConfig;
use crate::error::CoreError;
use crate::model::{
    FALLBACK_MAX_CURRENT_A, LedMode, LockStatus, MIN_CURRENT_A, Side, WallboxState,
};
use crate::snapshot::Snapshot;

/// Availability of the cached snapshot, derived from poll history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// No data fetched yet.
    Unknown,
    /// The last poll succeeded within the failure policy.
    Available,
    /// The failure threshold was crossed; cached values are stale.
    Unavailable,
}

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc`. [`connect()`](Self::connect) authenticates,
/// performs the initial refresh, and spawns the background poll task;
/// [`shutdown()`](Self::shutdown) cancels it. All reads go through the
/// snapshot; all writes go through [`execute()`](Self::execute).
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    api: WallboxClient,
    config: CoordinatorConfig,
    /// `None` until the first successful poll (the Unknown state).
    /// Replaced atomically; notification fires strictly after replacement
    /// and only when data or availability changed.
    snapshot_tx: watch::Sender<Option<Arc<Snapshot>>>,
    /// Serializes poll cycles: the timer tick and post-write confirm
    /// refreshes never interleave. Also guards the failure counter.
    poll_gate: Mutex<PollState>,
    write_locks: WriteLocks,
    cancel: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

struct PollState {
    consecutive_failures: u32,
}

/// One mutex per writable field group: a second write to the same field
/// queues behind the in-flight one, while unrelated fields may proceed
/// concurrently.
struct WriteLocks {
    current_limits: Mutex<()>,
    cable_locks: Mutex<()>,
    led: Mutex<()>,
}

impl Coordinator {
    /// Build a coordinator from connection parameters. Performs no I/O —
    /// call [`connect()`](Self::connect) to reach the device.
    pub fn new(config: CoordinatorConfig) -> Result<Self, CoreError> {
        let api = WallboxClient::new(
            &config.host,
            config.password.clone(),
            config.request_timeout,
        )?;
        let (snapshot_tx, _) = watch::channel(None);

        Ok(Self {
            inner: Arc::new(CoordinatorInner {
                api,
                config,
                snapshot_tx,
                poll_gate: Mutex::new(PollState {
                    consecutive_failures: 0,
                }),
                write_locks: WriteLocks {
                    current_limits: Mutex::new(()),
                    cable_locks: Mutex::new(()),
                    led: Mutex::new(()),
                },
                cancel: CancellationToken::new(),
                tasks: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Authenticate, perform the initial refresh, and start polling.
    ///
    /// A failing initial refresh is surfaced to the caller — there is no
    /// point starting the poll loop before the device has answered once
    /// with valid credentials.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.inner.api.login().await?;
        self.refresh().await?;

        let period = self.inner.config.poll_interval;
        if !period.is_zero() {
            debug!(period_secs = period.as_secs(), "starting poll task");
            let cancel = self.inner.cancel.child_token();
            let handle = tokio::spawn(poll_task(self.clone(), cancel));
            self.inner.tasks.lock().await.push(handle);
        }
        Ok(())
    }

    /// Stop the background poll task and wait for it to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        for handle in self.inner.tasks.lock().await.drain(..) {
            let _ = handle.await;
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The current snapshot, if any poll has ever succeeded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.snapshot_tx.borrow().clone()
    }

    /// Subscribe to snapshot replacements.
    ///
    /// The receiver is woken only when data or availability changed —
    /// no-op polls do not re-notify. That is a render-throttling
    /// optimization, not a correctness guarantee.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Current position in the availability state machine.
    pub fn availability(&self) -> Availability {
        match self.inner.snapshot_tx.borrow().as_deref() {
            None => Availability::Unknown,
            Some(snap) if snap.available => Availability::Available,
            Some(_) => Availability::Unavailable,
        }
    }

    // ── Poll cycle ───────────────────────────────────────────────────

    /// Run one poll cycle: fetch, apply the availability policy, publish.
    ///
    /// Communication failures are recorded in the failure counter and also
    /// returned, so on-demand callers (CLI one-shots, post-write confirms)
    /// see them; the background task merely logs the returned error.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let mut poll = self.inner.poll_gate.lock().await;

        match self.fetch().await {
            Ok(next) => {
                if poll.consecutive_failures > 0 {
                    info!(
                        failed_polls = poll.consecutive_failures,
                        "wallbox reachable again"
                    );
                }
                poll.consecutive_failures = 0;
                let notified = self.publish(next);
                trace!(notified, "poll cycle complete");
                Ok(())
            }
            Err(err) => {
                poll.consecutive_failures += 1;
                let failures = poll.consecutive_failures;
                let threshold = self.inner.config.failure_threshold;

                if failures == threshold {
                    warn!(failures, error = %err, "failure threshold reached, marking snapshot stale");
                    self.mark_unavailable();
                } else if failures < threshold {
                    debug!(failures, error = %err, "poll failed");
                } else {
                    trace!(failures, error = %err, "wallbox still unreachable");
                }
                Err(CoreError::Api(err))
            }
        }
    }

    /// Fetch one full snapshot from the device.
    ///
    /// The bulk report is mandatory; lock status and LED mode are fetched
    /// only when the device advertises the capability, and their individual
    /// failure degrades to `None` instead of failing the cycle.
    async fn fetch(&self) -> Result<Snapshot, wallbridge_api::Error> {
        let report = self.inner.api.status().await?;
        let state = WallboxState::from(report);

        let lock_status = if state.supports_lock {
            match self.inner.api.lock_status().await {
                Ok(report) => Some(LockStatus::from(report)),
                Err(err) => {
                    debug!(error = %err, "lock status fetch failed");
                    None
                }
            }
        } else {
            None
        };

        let led_mode = if state.supports_led {
            match self.inner.api.led_mode().await {
                Ok(raw) => Some(LedMode::from_wire(raw)),
                Err(err) => {
                    debug!(error = %err, "led mode fetch failed");
                    None
                }
            }
        } else {
            None
        };

        Ok(Snapshot {
            state,
            lock_status,
            led_mode,
            available: true,
            last_success: Utc::now(),
        })
    }

    /// Replace the stored snapshot, waking subscribers only on change.
    /// Returns whether subscribers were notified.
    fn publish(&self, next: Snapshot) -> bool {
        self.inner.snapshot_tx.send_if_modified(move |current| {
            let changed = match current.as_deref() {
                Some(prev) => !prev.same_data(&next),
                None => true,
            };
            *current = Some(Arc::new(next));
            changed
        })
    }

    /// Republish the current snapshot flagged stale, values retained.
    /// No-op in the Unknown state or when already unavailable.
    fn mark_unavailable(&self) {
        self.inner.snapshot_tx.send_if_modified(|current| {
            let stale = match current.as_deref() {
                Some(prev) if prev.available => Some(Arc::new(prev.as_unavailable())),
                _ => None,
            };
            match stale {
                Some(snapshot) => {
                    *current = Some(snapshot);
                    true
                }
                None => false,
            }
        });
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Validate and execute a write, then refresh to pick up the value the
    /// device actually committed.
    ///
    /// Validation failures and device errors both leave the snapshot
    /// untouched; only a successful write triggers the confirming refresh.
    pub async fn execute(&self, command: Command) -> Result<(), CoreError> {
        // Each arm holds its group lock across both the device write and
        // the confirming refresh: a queued write to the same group must
        // compose its payload from the committed snapshot, not the one the
        // in-flight write superseded. Lock order is group lock then
        // `poll_gate`; the poll task takes only `poll_gate`.
        //
        // The confirmed value may legitimately differ from the requested
        // one (firmware clamps current limits).
        match command {
            Command::SetCurrentLimit { target, amps } => {
                let _serialized = self.inner.write_locks.current_limits.lock().await;
                let snapshot = self.snapshot().ok_or(CoreError::NoData)?;
                let limits = compose_power_limits(&snapshot.state, target, amps)?;
                self.inner.api.set_power(limits).await?;
                self.refresh().await
            }
            Command::SetLock { side, locked } => {
                let _serialized = self.inner.write_locks.cable_locks.lock().await;
                let snapshot = self.snapshot().ok_or(CoreError::NoData)?;
                if !snapshot.state.supports_lock {
                    return Err(CoreError::validation(
                        command.field_name(),
                        "device has no cable lock",
                    ));
                }
                if !snapshot.state.has_side(side) {
                    return Err(CoreError::validation(
                        command.field_name(),
                        "device has a single charge point",
                    ));
                }
                self.inner.api.set_lock(side.wire_index(), locked).await?;
                self.refresh().await
            }
            Command::SetLedMode(mode) => {
                let _serialized = self.inner.write_locks.led.lock().await;
                let snapshot = self.snapshot().ok_or(CoreError::NoData)?;
                if !snapshot.state.supports_led {
                    return Err(CoreError::validation(
                        command.field_name(),
                        "device has no controllable status LED",
                    ));
                }
                self.inner.api.set_led_mode(mode.to_wire()).await?;
                self.refresh().await
            }
        }
    }
}

/// Compose the device's all-three-limits power payload with one limit
/// replaced, after range-checking the requested value.
fn compose_power_limits(
    state: &WallboxState,
    target: CurrentTarget,
    amps: u8,
) -> Result<PowerLimits, CoreError> {
    let field = match target {
        CurrentTarget::Total => "max_current_total",
        CurrentTarget::PerSide(Side::A) => "max_current_side_a",
        CurrentTarget::PerSide(Side::B) => "max_current_side_b",
    };

    if let CurrentTarget::PerSide(side) = target {
        if !state.has_side(side) {
            return Err(CoreError::validation(
                field,
                "device has a single charge point",
            ));
        }
    }

    let declared_max = match target {
        CurrentTarget::Total => state.input_lead_limit_a,
        CurrentTarget::PerSide(_) => state.per_side_limit_a,
    };
    let max = if declared_max == 0 {
        FALLBACK_MAX_CURRENT_A
    } else {
        declared_max
    };

    if amps < MIN_CURRENT_A || amps > max {
        return Err(CoreError::validation(
            field,
            format!("{amps} A is outside the allowed range {MIN_CURRENT_A}\u{2013}{max} A"),
        ));
    }

    let mut limits = PowerLimits {
        max_current_total: state.max_current_total_a,
        max_current_car1: state.side_a.max_current_a,
        max_current_car2: state.side_b.max_current_a,
    };
    match target {
        CurrentTarget::Total => limits.max_current_total = amps,
        CurrentTarget::PerSide(Side::A) => limits.max_current_car1 = amps,
        CurrentTarget::PerSide(Side::B) => limits.max_current_car2 = amps,
    }
    Ok(limits)
}

/// Fixed-interval poll loop. No backoff on failure: the interval itself
/// rate-limits retry attempts.
async fn poll_task(coordinator: Coordinator, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(coordinator.inner.config.poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                // Failures are already recorded in the availability state
                // machine; the error here is log-only.
                if let Err(err) = coordinator.refresh().await {
                    trace!(error = %err, "scheduled poll failed");
                }
            }
        }
    }
    debug!("poll task stopped");
}
