//! HTTP client for the VORP backend.
//!
//! Every request carries the stored credentials as cookies. Mutating
//! requests also carry the CSRF token in the configured header, fetching it
//! first when none is stored.

use std::sync::Arc;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use vorp_protocol::AnalyzedWord;

use crate::api::{self, AnalyzeRequest, AnalyzeResponse, ErrorBody, LoginRequest, UserProfile, VocabularyUpdate};
use crate::config::ClientConfig;
use crate::credentials::{CookieBridge, CredentialStore};
use crate::error::{ClientError, Result};

pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::new(CookieBridge::new(credentials.clone())))
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.credentials.get(&self.config.csrf_cookie)
    }

    pub fn has_session(&self) -> bool {
        self.credentials.get(&self.config.session_cookie).is_some()
    }

    /// Asks the backend to set the CSRF cookie.
    pub async fn fetch_csrf_token(&self) -> Result<String> {
        let url = self.config.endpoint(api::CSRF_TOKEN);
        tracing::debug!(%url, "fetching CSRF token");
        let response = self.http.get(&url).send().await.map_err(ClientError::Network)?;
        check_status(response).await?;

        self.csrf_token().ok_or_else(|| {
            ClientError::Decode(format!(
                "backend did not set the '{}' cookie",
                self.config.csrf_cookie
            ))
        })
    }

    async fn ensure_csrf(&self) -> Result<String> {
        match self.csrf_token() {
            Some(token) => Ok(token),
            None => self.fetch_csrf_token().await,
        }
    }

    /// Authenticates; the backend answers with a session cookie.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let response = self
            .send_mutating(api::LOGIN, &LoginRequest { email, password })
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("login accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = ErrorBody::parse(&body)
            .message()
            .unwrap_or_else(|| "Invalid credentials".to_string());
        if status.is_client_error() {
            Err(ClientError::Unauthorized { message })
        } else {
            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Current user. An authentication failure means there is no session.
    pub async fn profile(&self) -> Result<UserProfile> {
        self.get_json(api::USER_PROFILE).await
    }

    pub async fn logout(&self) -> Result<()> {
        let response = self.send_mutating(api::LOGOUT, &serde_json::json!({})).await?;
        check_status(response).await?;
        Ok(())
    }

    pub async fn analyze(&self, content: &str) -> Result<AnalyzeResponse> {
        self.post_json(api::ANALYZE, &AnalyzeRequest { content }).await
    }

    pub async fn update_vocabulary(&self, words: &[AnalyzedWord]) -> Result<()> {
        let response = self
            .send_mutating(api::UPDATE_VOCABULARY, &VocabularyUpdate { words })
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "GET");
        let response = self.http.get(&url).send().await.map_err(ClientError::Network)?;
        decode(check_status(response).await?).await
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let response = self.send_mutating(path, body).await?;
        decode(check_status(response).await?).await
    }

    /// POSTs `body` with the CSRF header. The status is left to the caller.
    async fn send_mutating<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        let token = self.ensure_csrf().await?;
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "POST");

        self.http
            .post(&url)
            .header(self.config.csrf_header.as_str(), token)
            .json(body)
            .send()
            .await
            .map_err(ClientError::Network)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = ErrorBody::parse(&body).message();
    tracing::debug!(status = status.as_u16(), ?message, "request failed");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized {
            message: message.unwrap_or_else(|| "Please log in to continue.".to_string()),
        },
        _ => ClientError::Server {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| format!("Request failed with status {}", status.as_u16())),
        },
    })
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R> {
    response
        .json::<R>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}
