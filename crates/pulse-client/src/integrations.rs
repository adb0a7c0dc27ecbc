//! Telegram integration.

use pulse_core::entities::{TelegramLink, TelegramProfile};

use crate::{ApiError, PulseClient, http};

impl PulseClient {
    /// `GET /integrations/telegram/profile/`. `Ok(None)` when not linked.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for any failure other than 404.
    pub async fn telegram_profile(&self) -> Result<Option<TelegramProfile>, ApiError> {
        let resp = self.get("integrations/telegram/profile/").send().await?;
        match http::json(resp).await {
            Ok(profile) => Ok(Some(profile)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// `POST /integrations/telegram/link-start/`: a deep link that binds the
    /// bot chat to this account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn telegram_link_start(&self) -> Result<TelegramLink, ApiError> {
        let resp = self.post("integrations/telegram/link-start/").send().await?;
        http::json(resp).await
    }
}
