//! Per-peer conversation messages.
//!
//! The backend keeps one conversation per (viewer, peer) pair spanning all
//! their tasks; narrowing to a task happens client-side.

use pulse_core::chat::MessageDraft;
use pulse_core::entities::{ChatMessage, UserId};
use reqwest::multipart::Form;

use crate::wire::TextMessageBody;
use crate::{ApiError, PulseClient, file_part, http};

const MESSAGES_PATH: &str = "tasks/conversation-messages/";

impl PulseClient {
    /// `GET /tasks/conversation-messages/?user_id={peer}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body is not a message list.
    pub async fn conversation(&self, peer: UserId) -> Result<Vec<ChatMessage>, ApiError> {
        let resp = self
            .get(MESSAGES_PATH)
            .query(&[("user_id", peer)])
            .send()
            .await?;
        http::json(resp).await
    }

    /// `POST /tasks/conversation-messages/`.
    ///
    /// Multipart when a file is attached, JSON otherwise. The draft is
    /// validated before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a draft with neither text nor file,
    /// otherwise any request failure.
    pub async fn send_message(&self, draft: &MessageDraft) -> Result<ChatMessage, ApiError> {
        draft.validate()?;

        let request = if let Some(file) = &draft.file {
            let mut form = Form::new().text("user_id", draft.peer.to_string());
            if let Some(task) = draft.task {
                form = form.text("task", task.to_string());
            }
            if let Some(text) = draft.body() {
                form = form.text("text", text.to_string());
            }
            form = form.part("file", file_part(file)?);
            self.post(MESSAGES_PATH).multipart(form)
        } else {
            self.post(MESSAGES_PATH).json(&TextMessageBody {
                user_id: draft.peer,
                text: draft.body().unwrap_or_default(),
                task: draft.task,
            })
        };

        let resp = request.send().await?;
        http::json(resp).await
    }
}
