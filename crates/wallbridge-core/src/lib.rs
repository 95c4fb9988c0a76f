//! Polling coordinator and domain model for the Alpha wallbox.
//!
//! This crate sits between `wallbridge-api` (raw HTTP transport) and
//! consumers such as the `wallbridge` CLI:
//!
//! - **[`Coordinator`]** — Central facade managing the device lifecycle:
//!   [`connect()`](Coordinator::connect) authenticates, performs an initial
//!   refresh, then spawns a background poll task. Writes go through
//!   [`execute()`](Coordinator::execute), which validates locally, calls the
//!   device, and immediately re-polls so the snapshot reflects the value the
//!   device actually committed (current limits may be clamped by firmware).
//!
//! - **[`Snapshot`]** — Immutable record of the last successfully read
//!   device state plus an availability flag. Published atomically as
//!   `Arc<Snapshot>` through a `tokio::sync::watch` channel; subscribers are
//!   woken only when data or availability actually changed.
//!
//! - **Availability state machine** — `Unknown` (no data yet, the channel
//!   holds `None`), `Available`, and `Unavailable` after a configurable
//!   number of consecutive poll failures. Stale values are retained so
//!   consumers can keep rendering the last known state.
//!
//! - **Domain model** ([`model`]) — Typed views of the device report:
//!   [`WallboxState`], [`ChargePointStatus`], [`LockStatus`], [`LedMode`].

pub mod command;
pub mod config;
pub mod convert;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod snapshot;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CurrentTarget};
pub use config::CoordinatorConfig;
pub use coordinator::{Availability, Coordinator};
pub use error::CoreError;
pub use snapshot::Snapshot;

pub use model::{ChargePoint, ChargePointStatus, LedMode, LockState, LockStatus, Side, SideLock, WallboxState};
