use thiserror::Error;

/// Errors produced by the wallbox HTTP client.
///
/// Each request maps to exactly one of these; the client never retries on
/// its own (the single 403 re-login is an auth-key refresh, not a retry).
#[derive(Debug, Error)]
pub enum Error {
    /// The device could not be reached (DNS, TCP, TLS, reset mid-request).
    #[error("cannot reach wallbox: {0}")]
    Connection(#[source] reqwest::Error),

    /// The device did not answer within the configured request deadline.
    #[error("wallbox did not respond within the request deadline")]
    Timeout,

    /// Login was rejected, or the auth key was refused even after re-login.
    #[error("wallbox authentication failed: {message}")]
    Authentication { message: String },

    /// The response body could not be decoded into the expected shape.
    /// A decode failure is never papered over with default values.
    #[error("malformed wallbox response: {message}")]
    Protocol { message: String },

    /// The device answered with a non-success HTTP status.
    #[error("wallbox API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The configured host could not be turned into a base URL.
    #[error("invalid wallbox address {address:?}")]
    InvalidAddress { address: String },
}

impl Error {
    /// Classify a transport-level `reqwest` failure.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Connection(err)
        }
    }
}
