//! The process-wide auth session.
//!
//! A [`Session`] is built once at start-up from the [`SessionStore`] and passed
//! explicitly to everything that needs identity. [`Session::set`] is the only
//! way to change it; every change is written through to the store.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use pulse_core::entities::AuthState;
use pulse_core::enums::UserRole;

use crate::error::AuthError;
use crate::store::{SessionSource, SessionStore};

#[derive(Debug)]
pub struct Session {
    state: RwLock<AuthState>,
    source: RwLock<Option<SessionSource>>,
    store: SessionStore,
}

impl Session {
    /// Restore the session persisted in `store`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be read.
    pub fn load(store: SessionStore) -> Result<Self, AuthError> {
        let (state, source) = match store.load()? {
            Some((state, source)) => (state, Some(source)),
            None => (AuthState::default(), None),
        };
        tracing::debug!(
            authenticated = state.is_authenticated(),
            source = source.map(SessionSource::as_str),
            "session restored"
        );
        Ok(Self {
            state: RwLock::new(state),
            source: RwLock::new(source),
            store,
        })
    }

    /// A logged-out session that persists nothing.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self {
            state: RwLock::new(AuthState::default()),
            source: RwLock::new(None),
            store: SessionStore::memory(),
        }
    }

    /// Replace the session state and persist it.
    ///
    /// A state without a token clears the store instead.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the store write fails; the in-memory state is
    /// updated regardless.
    pub fn set(&self, state: AuthState) -> Result<(), AuthError> {
        let persisted = if state.is_authenticated() {
            self.store.save(&state)
        } else {
            self.store.clear()
        };
        let authenticated = state.is_authenticated();
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
        *self.source.write().unwrap_or_else(PoisonError::into_inner) = None;
        tracing::debug!(authenticated, "session updated");
        persisted
    }

    /// Drop the token and identity and clear the store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the persisted blob cannot be removed.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.set(AuthState::default())
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.read().clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read().token.clone().filter(|token| !token.is_empty())
    }

    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.read().role()
    }

    #[must_use]
    pub fn email(&self) -> Option<String> {
        self.read().user.as_ref().map(|user| user.email.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// Where the state was restored from; `None` after any [`Session::set`].
    #[must_use]
    pub fn source(&self) -> Option<SessionSource> {
        *self.source.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Token, or `NotAuthenticated`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` when no token is present.
    pub fn require_token(&self) -> Result<String, AuthError> {
        self.token().ok_or(AuthError::NotAuthenticated)
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}
