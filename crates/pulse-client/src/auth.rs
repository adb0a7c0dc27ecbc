//! Authentication endpoints under `/auth/`.
//!
//! None of these touch the [`pulse_auth::Session`]; callers decide whether to
//! store the returned state.

use pulse_core::entities::AuthState;
use pulse_core::enums::UserRole;

use crate::wire::{
    AuthResponse, Credentials, Detail, EmailBody, InviteAcceptance, PasswordChange,
    PasswordResetConfirm, Registration, TokenBody,
};
use crate::{ApiError, PulseClient, http};

impl PulseClient {
    /// `POST /auth/login/`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response has no role.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthState, ApiError> {
        let resp = self.post("auth/login/").json(credentials).send().await?;
        let body: AuthResponse = http::json(resp).await?;
        body.into_state(&credentials.email, None)
    }

    /// `POST /auth/register/`: creates a creator account pending email
    /// verification.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the backend rejects it.
    pub async fn register(&self, registration: &Registration) -> Result<Detail, ApiError> {
        let resp = self.post("auth/register/").json(registration).send().await?;
        http::json(resp).await
    }

    /// `POST /auth/accept-invite/`: executors join through an invitation token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the backend rejects it.
    pub async fn accept_invite(&self, acceptance: &InviteAcceptance) -> Result<AuthState, ApiError> {
        let resp = self.post("auth/accept-invite/").json(acceptance).send().await?;
        let body: AuthResponse = http::json(resp).await?;
        body.into_state("", Some(UserRole::Executor))
    }

    /// `POST /auth/verify-email/`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the token is rejected.
    pub async fn verify_email(&self, token: &str) -> Result<Detail, ApiError> {
        let resp = self.post("auth/verify-email/").json(&TokenBody { token }).send().await?;
        http::json(resp).await
    }

    /// `POST /auth/resend-verification/`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn resend_verification(&self, email: &str) -> Result<Detail, ApiError> {
        let resp = self
            .post("auth/resend-verification/")
            .json(&EmailBody { email })
            .send()
            .await?;
        http::json(resp).await
    }

    /// `POST /auth/change-password/`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the old password is wrong.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<Detail, ApiError> {
        let resp = self.post("auth/change-password/").json(change).send().await?;
        http::json(resp).await
    }

    /// `POST /auth/password-reset/`: mails a reset link to `email`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the backend rejects the address.
    pub async fn request_password_reset(&self, email: &str) -> Result<Detail, ApiError> {
        let resp = self.post("auth/password-reset/").json(&EmailBody { email }).send().await?;
        http::json(resp).await
    }

    /// `POST /auth/password-reset-confirm/`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the reset token is rejected.
    pub async fn confirm_password_reset(&self, reset: &PasswordResetConfirm) -> Result<Detail, ApiError> {
        if reset.new_password != reset.new_password_confirm {
            return Err(ApiError::Validation("passwords do not match".into()));
        }
        let resp = self.post("auth/password-reset-confirm/").json(reset).send().await?;
        http::json(resp).await
    }

    /// `POST /auth/invitations/`: a creator invites an executor by email.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the backend rejects it.
    pub async fn invite_executor(&self, email: &str) -> Result<Detail, ApiError> {
        let resp = self.post("auth/invitations/").json(&EmailBody { email }).send().await?;
        http::json(resp).await
    }
}
