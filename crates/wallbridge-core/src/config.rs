//! Coordinator construction parameters.

use std::time::Duration;

use secrecy::SecretString;

/// Default poll period; matches the device vendor's own app cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Consecutive poll failures before the snapshot is flagged stale.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Per-request deadline; a timed-out request counts as a failed poll.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection parameters for one wallbox, supplied once at setup.
///
/// The coordinator never re-reads these — reconfiguration means building a
/// new coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Device address: IP or hostname, optionally with a scheme.
    pub host: String,
    /// Device password used for `AuthKey` logins.
    pub password: SecretString,
    /// Fixed poll period. `Duration::ZERO` disables the background task
    /// (manual `refresh()` only), which the CLI uses for one-shot commands.
    pub poll_interval: Duration,
    /// Consecutive failures before flipping to unavailable.
    pub failure_threshold: u32,
    /// HTTP request deadline.
    pub request_timeout: Duration,
}

impl CoordinatorConfig {
    pub fn new(host: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            password,
            poll_interval: DEFAULT_POLL_INTERVAL,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Disable the background poll task (one-shot use).
    pub fn without_polling(mut self) -> Self {
        self.poll_interval = Duration::ZERO;
        self
    }
}
