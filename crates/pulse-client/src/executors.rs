use pulse_core::entities::Executor;

use crate::{ApiError, PulseClient, http};

impl PulseClient {
    /// `GET /auth/executors/`: the executors a creator can assign to.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body is not a list.
    pub async fn list_executors(&self) -> Result<Vec<Executor>, ApiError> {
        let resp = self.get("auth/executors/").send().await?;
        http::json(resp).await
    }
}
