//! REST client error types.

use thiserror::Error;

/// Errors from talking to the TaskPulse backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the token (401) or the action (403).
    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// 404 from the backend.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Whether the session should be treated as expired.
    #[must_use]
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// HTTP status, when the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::Http(error) => error.status().map(|s| s.as_u16()),
            Self::Parse(_) | Self::Validation(_) => None,
        }
    }
}

impl From<pulse_core::CoreError> for ApiError {
    fn from(error: pulse_core::CoreError) -> Self {
        Self::Validation(error.to_string())
    }
}
