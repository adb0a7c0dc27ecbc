//! Task endpoints under `/tasks/`.

use pulse_core::entities::{Task, TaskId, Upload};
use pulse_core::enums::TaskStatus;
use pulse_core::projection::TaskFilters;
use reqwest::multipart::Form;

use crate::wire::{ExtensionBody, NewTask, TaskPatch};
use crate::{ApiError, PulseClient, file_part, http};

impl PulseClient {
    /// `GET /tasks/` with server-side filters. Creator-only filters are
    /// dropped when the session role is executor.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body is not a task list.
    pub async fn list_tasks(&self, filters: &TaskFilters) -> Result<Vec<Task>, ApiError> {
        let params = filters.query_params(self.session().role());
        let resp = self.get("tasks/").query(&params).send().await?;
        http::json(resp).await
    }

    /// `GET /tasks/{id}/`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn get_task(&self, id: TaskId) -> Result<Task, ApiError> {
        let resp = self.get(&format!("tasks/{id}/")).send().await?;
        http::json(resp).await
    }

    /// `POST /tasks/`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a blank title, otherwise any
    /// request failure.
    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        if task.title.trim().is_empty() {
            return Err(ApiError::Validation("task title is required".into()));
        }
        let resp = self.post("tasks/").json(task).send().await?;
        http::json(resp).await
    }

    /// `PATCH /tasks/{id}/`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty patch, otherwise any
    /// request failure.
    pub async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        if patch.is_empty() {
            return Err(ApiError::Validation("nothing to update".into()));
        }
        let resp = self.patch(&format!("tasks/{id}/")).json(patch).send().await?;
        http::json(resp).await
    }

    /// Request a status change. The backend decides whether it is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the transition is refused.
    pub async fn set_task_status(&self, id: TaskId, status: TaskStatus) -> Result<Task, ApiError> {
        self.update_task(id, &TaskPatch::status(status)).await
    }

    /// `POST /tasks/{id}/attachments/` (multipart `file`). Answers 204 or the task.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn upload_attachment(&self, id: TaskId, file: &Upload) -> Result<(), ApiError> {
        let form = Form::new().part("file", file_part(file)?);
        let resp = self
            .post(&format!("tasks/{id}/attachments/"))
            .multipart(form)
            .send()
            .await?;
        http::empty(resp).await
    }

    /// `POST /tasks/{id}/confirm-on-time/`: the executor confirms they will
    /// meet the deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn confirm_on_time(&self, id: TaskId) -> Result<Task, ApiError> {
        let resp = self.post(&format!("tasks/{id}/confirm-on-time/")).send().await?;
        http::json(resp).await
    }

    /// `POST /tasks/{id}/extend-1d/`: ask for one more day.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the extension is refused.
    pub async fn request_extension(&self, id: TaskId, comment: &str) -> Result<Task, ApiError> {
        let resp = self
            .post(&format!("tasks/{id}/extend-1d/"))
            .json(&ExtensionBody { comment })
            .send()
            .await?;
        http::json(resp).await
    }
}
