use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not logged in, run `pulse auth login`")]
    NotAuthenticated,

    #[error("session expired, run `pulse auth login` again")]
    SessionExpired,

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("session store error: {0}")]
    Storage(String),

    #[error("session blob is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}
