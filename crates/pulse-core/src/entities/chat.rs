use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{MessageId, TaskId, UserId};

/// A message in the two-party conversation between a creator and an executor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    #[serde(default, alias = "task_id")]
    pub task: Option<TaskId>,
    #[serde(default)]
    pub task_title: Option<String>,
    /// `None` only for pending messages synthesized on the client.
    #[serde(default)]
    pub sender: Option<UserId>,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub is_from_creator: bool,
    #[serde(default)]
    pub is_from_executor: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Message body, treating an empty string as no text.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.is_empty())
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.id < 0
    }
}
