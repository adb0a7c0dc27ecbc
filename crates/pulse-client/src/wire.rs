//! Request and response bodies that only exist on the wire.

use pulse_core::entities::{AuthState, AuthUser, TaskId, UserId};
use pulse_core::enums::{TaskPriority, TaskStatus, UserRole};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InviteAcceptance {
    pub token: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub position: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetConfirm {
    pub reset_token: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Login / accept-invite response.
///
/// Two shapes are in circulation: flat `{token, email, role}` and nested
/// `{token, user: {email, role}}`. Accept-invite may omit the role entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub user: Option<AuthResponseUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponseUser {
    pub email: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl AuthResponse {
    /// Convert to a session state, using `fallback_email` / `fallback_role`
    /// for fields the response left out.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Parse` when no role can be determined.
    pub fn into_state(self, fallback_email: &str, fallback_role: Option<UserRole>) -> Result<AuthState, ApiError> {
        let (nested_email, nested_role) = self
            .user
            .map_or((None, None), |user| (Some(user.email), user.role));
        let email = nested_email
            .or(self.email)
            .unwrap_or_else(|| fallback_email.to_string());
        let role = nested_role
            .or(self.role)
            .or(fallback_role)
            .ok_or_else(|| ApiError::Parse("auth response carries no role".into()))?;
        Ok(AuthState {
            token: Some(self.token),
            user: Some(AuthUser { email, role }),
        })
    }
}

/// `{detail}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Detail {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct EmailBody<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TokenBody<'a> {
    pub token: &'a str,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Fields for a new task.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserId>,
}

/// Partial task update; unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor_comment: Option<String>,
}

impl TaskPatch {
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn comment(comment: impl Into<String>) -> Self {
        Self {
            executor_comment: Some(comment.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.due_at.is_none()
            && self.assignee.is_none()
            && self.executor_comment.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ExtensionBody<'a> {
    pub comment: &'a str,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TextMessageBody<'a> {
    pub user_id: UserId,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskId>,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Profile fields to change.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub avatar: Option<pulse_core::entities::Upload>,
}

impl ProfilePatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.company.is_none() && self.position.is_none() && self.avatar.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flat_login_response() {
        let raw = r#"{"token": "abc", "email": "anna@example.com", "role": "CREATOR"}"#;
        let resp: AuthResponse = serde_json::from_str(raw).unwrap();
        let state = resp.into_state("typed@example.com", None).unwrap();
        assert_eq!(state, AuthState::new("abc", "anna@example.com", UserRole::Creator));
    }

    #[test]
    fn nested_login_response() {
        let raw = r#"{"token": "abc", "user": {"id": 3, "email": "boris@example.com", "role": "executor"}}"#;
        let resp: AuthResponse = serde_json::from_str(raw).unwrap();
        let state = resp.into_state("typed@example.com", None).unwrap();
        assert_eq!(state, AuthState::new("abc", "boris@example.com", UserRole::Executor));
    }

    #[test]
    fn accept_invite_response_falls_back_to_inputs() {
        let raw = r#"{"token": "xyz", "email": "new@example.com"}"#;
        let resp: AuthResponse = serde_json::from_str(raw).unwrap();
        let state = resp
            .into_state("ignored@example.com", Some(UserRole::Executor))
            .unwrap();
        assert_eq!(state, AuthState::new("xyz", "new@example.com", UserRole::Executor));
    }

    #[test]
    fn missing_role_is_a_parse_error() {
        let resp: AuthResponse = serde_json::from_str(r#"{"token": "t"}"#).unwrap();
        assert!(matches!(resp.into_state("a@b.c", None), Err(ApiError::Parse(_))));
    }

    #[test]
    fn task_patch_serializes_only_set_fields() {
        let body = serde_json::to_value(TaskPatch::status(TaskStatus::Done)).unwrap();
        assert_eq!(body, serde_json::json!({"status": "done"}));
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn text_message_omits_missing_task() {
        let body = serde_json::to_value(TextMessageBody {
            user_id: 4,
            text: "hi",
            task: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"user_id": 4, "text": "hi"}));
    }
}
