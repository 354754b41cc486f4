//! Errors reported by session lifecycle operations
//!
//! The taxonomy is driven by what a caller can usefully do next: a
//! [`ValidationError`] means the request never left the process and can be
//! corrected locally; an authentication failure means the platform was
//! reached (or reaching it failed) and retrying is the caller's decision.
//! Nothing here is retried internally.

use std::error;

use flugo_clock::UnixTime;
use thiserror::Error;

/// An opaque error reported by a credential store implementation
pub type StoreError = Box<dyn error::Error + Send + Sync + 'static>;

/// An opaque error reported by a gateway implementation
pub type GatewayError = Box<dyn error::Error + Send + Sync + 'static>;

/// A locally-checked request field was missing or empty
///
/// Raised before any network traffic; the operation it aborts has no
/// remote side effects.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A field the platform requires was missing or empty
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

/// Asked for the current token while no session is established
///
/// Being without a session is an ordinary state for polling code, so
/// expiry inspection reports zero remaining seconds instead of this error;
/// only operations that need a concrete credential raise it.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("no active session token")]
pub struct NoActiveSession;

/// An error while running a session lifecycle operation
#[derive(Debug, Error)]
pub enum SessionError {
    /// The platform failed or rejected the call
    ///
    /// Covers transport failures, error statuses, and responses that could
    /// not be understood; the gateway's own error is attached as the
    /// source.
    #[error("authentication call to the platform failed")]
    Authentication(#[source] GatewayError),

    /// A locally-required field was missing; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The authority reported an expiry that is not after the issue time
    #[error("authority issued a session expiring at {expiry}, not after its issue time {issued}")]
    ImplausibleExpiry {
        /// When the manager admitted the grant
        issued: UnixTime,
        /// The expiry the authority claimed
        expiry: UnixTime,
    },

    /// An upgrade completed without the replacement token it must produce
    #[error("authority acknowledged the upgrade but issued no session token")]
    NoTokenIssued,

    /// A keep-alive returned no replacement for a session that had already
    /// expired locally
    #[error("keep-alive returned no replacement for an expired session")]
    ExpiredKeepAlive,
}

impl SessionError {
    /// Wraps a gateway failure
    pub fn authentication<E>(err: E) -> Self
    where
        E: Into<GatewayError>,
    {
        Self::Authentication(err.into())
    }
}
