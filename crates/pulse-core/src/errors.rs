//! Cross-cutting error types for Pulse.
//!
//! Transport and backend errors live in `pulse-client`; this module only holds
//! failures raised by client-side validation before anything is sent.

use thiserror::Error;

/// Errors that can be raised by any Pulse crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Data failed validation (empty message, malformed identifier, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A value could not be parsed into a domain type.
    #[error("invalid {field} '{value}'")]
    InvalidValue { field: String, value: String },
}
