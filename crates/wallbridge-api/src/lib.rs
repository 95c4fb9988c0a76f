//! Async client for the Alpha wallbox's local HTTP API.
//!
//! The wallbox exposes a small JSON-over-HTTP surface on the local network:
//! a password login that yields an `AuthKey` header token, a bulk status
//! endpoint (`/api/v1/all`), a lock-status endpoint, and write endpoints for
//! current limits, cable locks, and the status LED.
//!
//! [`WallboxClient`] is a thin transport wrapper: one call is one request
//! (plus at most one transparent re-login when the device rejects a stale
//! auth key). It performs no caching and no retry policy — polling cadence
//! and failure accounting belong to the coordinator layer above.

pub mod client;
pub mod error;
pub mod models;

pub use client::WallboxClient;
pub use error::Error;
pub use models::{LedModeBody, LockCommand, LockReport, PowerLimits, StatusReport};
