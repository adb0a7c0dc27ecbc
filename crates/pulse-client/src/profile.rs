//! The current user's profile.

use pulse_core::entities::UserProfile;
use reqwest::multipart::Form;

use crate::wire::ProfilePatch;
use crate::{ApiError, PulseClient, file_part, http};

impl PulseClient {
    /// `GET /auth/profile/`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`]; a 401/403 means the stored token is no longer valid.
    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        let resp = self.get("auth/profile/").send().await?;
        http::json(resp).await
    }

    /// `PATCH /auth/profile/` as multipart, so an avatar can ride along.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty patch, otherwise any
    /// request failure.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<UserProfile, ApiError> {
        if patch.is_empty() {
            return Err(ApiError::Validation("nothing to update".into()));
        }

        let mut form = Form::new();
        for (name, value) in [
            ("full_name", &patch.full_name),
            ("company", &patch.company),
            ("position", &patch.position),
        ] {
            if let Some(value) = value {
                form = form.text(name, value.clone());
            }
        }
        if let Some(avatar) = &patch.avatar {
            form = form.part("avatar", file_part(avatar)?);
        }

        let resp = self.patch("auth/profile/").multipart(form).send().await?;
        http::json(resp).await
    }
}
