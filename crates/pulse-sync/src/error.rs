use pulse_client::ApiError;
use pulse_core::chat::MessageDraft;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// This caller's own request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A request this caller joined failed.
    #[error("{message}")]
    Shared { message: String, auth_expired: bool },

    /// A joined request ended without producing data.
    #[error("request for {0} was abandoned")]
    Abandoned(String),

    #[error("not logged in")]
    SignedOut,
}

impl SyncError {
    #[must_use]
    pub const fn is_auth_expired(&self) -> bool {
        match self {
            Self::Api(error) => error.is_auth_expired(),
            Self::Shared { auth_expired, .. } => *auth_expired,
            Self::Abandoned(_) | Self::SignedOut => false,
        }
    }
}

/// A failed send. The draft comes back untouched so the caller can retry.
#[derive(Debug, Error)]
#[error("message not sent")]
pub struct SendError {
    pub draft: MessageDraft,
    pub source: ApiError,
}
