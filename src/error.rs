use thiserror::Error;

use crate::alert::AlertDescription;

/// Errors raised by cipher activation and alert dispatch.
///
/// Every variant is either fatal (the connection must be torn down) or a
/// rejection (the alert was not queued, the connection is still usable).
/// See [`Error::is_fatal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("change-cipher-spec received before key material available")]
    CcsReceivedEarly,

    #[error("Record layer has a pending write not started by the alert dispatcher")]
    UnexpectedPendingWrite,

    #[error("Key schedule failure: {0}")]
    KeySchedule(String),

    #[error("Alert {0} has no code in this protocol version")]
    AlertUnsupported(AlertDescription),

    #[error("Alert {0} refused after close_notify was sent")]
    AlertAfterCloseNotify(AlertDescription),

    #[error("Alert already queued or in flight")]
    AlertBusy,
}

impl Error {
    /// Whether the error requires tearing down the connection.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::CcsReceivedEarly | Error::UnexpectedPendingWrite | Error::KeySchedule(_) => true,
            Error::AlertUnsupported(_) | Error::AlertAfterCloseNotify(_) | Error::AlertBusy => {
                false
            }
        }
    }
}
