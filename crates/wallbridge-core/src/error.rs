use thiserror::Error;

/// Errors surfaced by the coordinator to its callers.
///
/// Poll-cycle communication failures are *not* propagated through this type;
/// they are absorbed into the availability state machine. Writes, on the
/// other hand, surface every failure directly so the caller can report it.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A device API call failed (connection, timeout, auth, protocol, HTTP).
    #[error(transparent)]
    Api(#[from] wallbridge_api::Error),

    /// A write value violated the field's declared constraints. The request
    /// never reached the network and the snapshot is untouched.
    #[error("invalid value for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A write was attempted before the first successful poll. The device
    /// requires composite write payloads built from current state, so there
    /// is nothing safe to send yet.
    #[error("no device data yet — wait for the first successful poll")]
    NoData,
}

impl CoreError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
