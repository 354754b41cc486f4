use flugo_session::{NoActiveSession, ValidationError};
use thiserror::Error;

/// An error arising from a call into one of the platform's domain services
#[derive(Debug, Error)]
pub enum ApiError {
    /// No session has been established, so there is no credential to
    /// attach to the request
    #[error(transparent)]
    NoSession(#[from] NoActiveSession),

    /// The request could not be completed at the transport level
    #[error("unable to complete the request to the platform")]
    Request(#[source] reqwest::Error),

    /// The platform answered with a non-success status
    ///
    /// The response body is retained for inspection but not printed, as
    /// the platform's error pages can be large.
    #[error("the platform answered {status} for `{path}`")]
    Status {
        /// The HTTP status the platform answered with
        status: reqwest::StatusCode,
        /// The path the request was sent to
        path: String,
        /// The response body, when it could be read
        body: String,
    },

    /// The response body did not match the expected shape
    #[error("unable to decode the platform's response")]
    Decode(#[from] serde_json::Error),

    /// The request payload failed validation before anything was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The configured base URL cannot be combined with the request path
    #[error("invalid request URL")]
    BadUrl(#[from] url::ParseError),
}
