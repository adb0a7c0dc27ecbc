//! # pulse-auth
//!
//! Session state for Pulse: the persisted auth blob (token + email + role) and
//! the explicit [`Session`] object that request code and guards read.
//!
//! Storage priority on load: `PULSE_AUTH__TOKEN` env (token only) over the OS
//! keychain (`keyring`) over the file fallback.

pub mod error;
pub mod session;
pub mod store;

pub use error::AuthError;
pub use session::Session;
pub use store::{SessionSource, SessionStore};
