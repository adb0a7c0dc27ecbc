use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::UserId;
use crate::enums::UserRole;

/// An executor as listed for the creator who invited them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Executor {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Executor {
    /// Name shown in lists: full name, falling back to email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}

/// The signed-in user's own profile.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub role: UserRole,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub invited_by: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}
