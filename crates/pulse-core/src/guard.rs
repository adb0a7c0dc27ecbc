//! Access decisions for views that need a session or a specific role.

use crate::entities::AuthState;
use crate::enums::UserRole;

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    RedirectToLogin,
    /// Logged in, but not allowed here.
    RedirectToFallback,
}

impl GuardDecision {
    #[must_use]
    pub const fn allows(self) -> bool {
        matches!(self, Self::Render)
    }
}

/// Decide whether a view may render for `auth`.
///
/// `required` of `None` admits any logged-in user.
#[must_use]
pub fn decide(auth: &AuthState, required: Option<&[UserRole]>) -> GuardDecision {
    let Some(user) = auth.user.as_ref().filter(|_| auth.is_authenticated()) else {
        return GuardDecision::RedirectToLogin;
    };
    match required {
        Some(roles) if !roles.contains(&user.role) => GuardDecision::RedirectToFallback,
        _ => GuardDecision::Render,
    }
}

/// Gate for views that need a linked Telegram account.
#[must_use]
pub fn telegram_gate(auth: &AuthState, linked: bool) -> GuardDecision {
    match decide(auth, None) {
        GuardDecision::Render if !linked => GuardDecision::RedirectToFallback,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AuthUser;
    use rstest::rstest;

    fn creator() -> AuthState {
        AuthState::new("tok", "boss@example.com", UserRole::Creator)
    }

    #[test]
    fn logged_out_goes_to_login() {
        assert_eq!(decide(&AuthState::default(), None), GuardDecision::RedirectToLogin);
        assert_eq!(
            decide(&AuthState::default(), Some(&[UserRole::Creator])),
            GuardDecision::RedirectToLogin
        );
    }

    #[test]
    fn token_without_user_goes_to_login() {
        let auth = AuthState {
            token: Some("tok".into()),
            user: None,
        };
        assert_eq!(decide(&auth, None), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn empty_token_goes_to_login() {
        let auth = AuthState {
            token: Some(String::new()),
            user: Some(AuthUser {
                email: "a@b.c".into(),
                role: UserRole::Creator,
            }),
        };
        assert_eq!(decide(&auth, None), GuardDecision::RedirectToLogin);
    }

    #[rstest]
    #[case(None, GuardDecision::Render)]
    #[case(Some(&[UserRole::Creator][..]), GuardDecision::Render)]
    #[case(Some(&[UserRole::Executor][..]), GuardDecision::RedirectToFallback)]
    #[case(Some(&[UserRole::Executor, UserRole::Creator][..]), GuardDecision::Render)]
    fn role_requirements(#[case] required: Option<&[UserRole]>, #[case] expected: GuardDecision) {
        assert_eq!(decide(&creator(), required), expected);
    }

    #[test]
    fn telegram_gate_requires_link() {
        assert_eq!(telegram_gate(&creator(), true), GuardDecision::Render);
        assert_eq!(telegram_gate(&creator(), false), GuardDecision::RedirectToFallback);
        assert_eq!(
            telegram_gate(&AuthState::default(), false),
            GuardDecision::RedirectToLogin
        );
    }
}
