use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::UserRole;

/// Minimal identity kept alongside the token.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
    pub role: UserRole,
}

/// Persisted authentication state. The default value means logged out.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthState {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

impl AuthState {
    #[must_use]
    pub fn new(token: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(AuthUser {
                email: email.into(),
                role,
            }),
        }
    }

    /// A non-empty token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|user| user.role)
    }
}
