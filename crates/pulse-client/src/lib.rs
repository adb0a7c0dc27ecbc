//! # pulse-client
//!
//! Typed REST client for the TaskPulse backend.
//!
//! One [`PulseClient`] holds one `reqwest::Client` and the shared
//! [`Session`]; every outgoing request carries `Authorization: Token <token>`
//! when the session has a token. Resource modules add typed wrappers:
//! - `auth`: login, registration, invitations, email verification, passwords
//! - `tasks`: list/get/create/update, attachments, executor actions
//! - `chat`: per-peer conversation messages
//! - `executors`: the creator's executor roster
//! - `profile`: the current user's profile
//! - `integrations`: Telegram linking
//! - `reports`: monthly KPI (JSON and CSV)

pub mod auth;
pub mod chat;
pub mod executors;
pub mod integrations;
pub mod profile;
pub mod reports;
pub mod tasks;
pub mod wire;

mod error;
mod http;

pub use error::ApiError;
pub use http::extract_message;

use std::sync::Arc;
use std::time::Duration;

use pulse_auth::Session;
use pulse_config::ApiConfig;
use pulse_core::entities::Upload;
use reqwest::{Method, RequestBuilder, header, multipart};

/// HTTP client for the TaskPulse REST API.
#[derive(Debug, Clone)]
pub struct PulseClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl PulseClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn new(config: &ApiConfig, session: Arc<Session>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("pulse/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            session,
        })
    }

    /// Client against `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn with_base_url(base_url: impl Into<String>, session: Arc<Session>) -> Result<Self, ApiError> {
        let config = ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::new(&config, session)
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request with the session token attached.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "api request");
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Token {token}")),
            None => builder,
        }
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub(crate) fn patch(&self, path: &str) -> RequestBuilder {
        self.request(Method::PATCH, path)
    }
}

/// Multipart part for an in-memory upload.
pub(crate) fn file_part(upload: &Upload) -> Result<multipart::Part, ApiError> {
    Ok(multipart::Part::bytes(upload.bytes.clone())
        .file_name(upload.file_name.clone())
        .mime_str(upload.mime())?)
}
