//! Errors raised at the completion provider boundary.

use thiserror::Error;

/// Failure talking to the upstream text-generation provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The credential was rejected (or is missing).
    #[error("upstream authentication failed: {0}")]
    Auth(String),

    #[error("upstream rate limited: {0}")]
    RateLimited(String),

    #[error("upstream connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status not covered by a more specific variant.
    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The provider answered, but not with the chat-completion shape we expect.
    #[error("malformed upstream envelope: {0}")]
    MalformedEnvelope(String),
}

impl UpstreamError {
    /// Short machine-friendly name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Auth(_) => "auth",
            UpstreamError::RateLimited(_) => "rate_limited",
            UpstreamError::Connection(_) => "connection",
            UpstreamError::Status { .. } => "status",
            UpstreamError::MalformedEnvelope(_) => "malformed_envelope",
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, UpstreamError::Auth(_))
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::MalformedEnvelope(err.to_string())
        } else {
            UpstreamError::Connection(err.to_string())
        }
    }
}
