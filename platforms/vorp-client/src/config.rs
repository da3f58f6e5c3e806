//! Configuration management for the VORP client

use std::env;
use std::path::PathBuf;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin, without a trailing slash.
    pub api_url: String,
    /// Cookie the backend stores the CSRF token in.
    pub csrf_cookie: String,
    /// Header mutating requests echo the CSRF token in.
    pub csrf_header: String,
    pub session_cookie: String,
    /// Where the CLI keeps credentials between runs.
    pub credentials_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: DEFAULT_API_URL.to_string(),
            csrf_cookie: "csrftoken".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
            session_cookie: "sessionid".to_string(),
            credentials_path: None,
        }
    }
}

impl ClientConfig {
    /// Reads `VORP_*` variables. Load a `.env` file first if one is used.
    pub fn from_env() -> Result<Self> {
        let defaults = ClientConfig::default();
        let config = ClientConfig {
            api_url: env::var("VORP_API_URL").unwrap_or(defaults.api_url),
            csrf_cookie: env::var("VORP_CSRF_COOKIE").unwrap_or(defaults.csrf_cookie),
            csrf_header: env::var("VORP_CSRF_HEADER").unwrap_or(defaults.csrf_header),
            session_cookie: env::var("VORP_SESSION_COOKIE").unwrap_or(defaults.session_cookie),
            credentials_path: env::var_os("VORP_CREDENTIALS_PATH").map(PathBuf::from),
        };
        config.validated()
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Result<Self> {
        self.api_url = api_url.into();
        self.validated()
    }

    fn validated(mut self) -> Result<Self> {
        reqwest::Url::parse(&self.api_url)
            .map_err(|e| ClientError::Config(format!("VORP_API_URL '{}': {}", self.api_url, e)))?;
        while self.api_url.ends_with('/') {
            self.api_url.pop();
        }
        Ok(self)
    }

    /// Absolute URL for an API path such as `/api/login/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = ClientConfig::default()
            .with_api_url("http://localhost:8000/")
            .unwrap();
        assert_eq!(config.endpoint("/api/login/"), "http://localhost:8000/api/login/");
    }

    #[test]
    fn test_rejects_invalid_url() {
        let err = ClientConfig::default().with_api_url("not a url").unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
