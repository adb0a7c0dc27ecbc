//! Backend API connection settings.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    String::from("http://localhost:8000/api")
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the REST API, including the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    #[must_use]
    pub fn is_valid_base_url(&self) -> bool {
        let url = self.base_url();
        (url.starts_with("http://") || url.starts_with("https://")) && url.len() > "https://".len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8000/api");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.is_valid_base_url());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ApiConfig {
            base_url: "https://pulse.example.com/api/".into(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://pulse.example.com/api");
    }

    #[test]
    fn rejects_non_http_scheme() {
        let config = ApiConfig {
            base_url: "ftp://pulse.example.com".into(),
            ..Default::default()
        };
        assert!(!config.is_valid_base_url());
    }
}
