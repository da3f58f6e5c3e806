//! Explicit auth context: probes the session once, owns the current user,
//! and tears credentials down on logout.

use std::sync::Arc;

use crate::api::UserProfile;
use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::forms::LoginForm;

/// Outcome of guarding a protected page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The session probe has not settled yet.
    Loading,
    Granted,
    RedirectToLogin,
}

pub struct AuthContext {
    client: Arc<ApiClient>,
    user: Option<UserProfile>,
    loading: bool,
}

impl AuthContext {
    /// A context that has not probed the session yet.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            user: None,
            loading: true,
        }
    }

    /// Creates the context and probes the session once.
    pub async fn initialize(client: Arc<ApiClient>) -> Self {
        let mut context = Self::new(client);
        context.refresh().await;
        context
    }

    /// Re-probes the session. Any failure leaves no user.
    pub async fn refresh(&mut self) {
        self.loading = true;
        self.user = match self.client.profile().await {
            Ok(profile) => {
                tracing::info!(username = %profile.username, "session restored");
                Some(profile)
            }
            Err(e) if e.is_unauthorized() => {
                tracing::debug!("no active session");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to check user session");
                None
            }
        };
        self.loading = false;
    }

    /// Validates the form, logs in, then loads the profile.
    pub async fn login(&mut self, form: &LoginForm) -> Result<&UserProfile> {
        form.validate()?;

        self.loading = true;
        let result = self.authenticate(form).await;
        self.loading = false;

        match result {
            Ok(profile) => {
                tracing::info!(username = %profile.username, "Welcome back!");
                let user: &UserProfile = self.user.insert(profile);
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Login Failed");
                Err(e)
            }
        }
    }

    async fn authenticate(&self, form: &LoginForm) -> Result<UserProfile> {
        self.client.login(form.email.trim(), &form.password).await?;
        self.client
            .profile()
            .await
            .map_err(|e| ClientError::ProfileUnavailable(Box::new(e)))
    }

    /// Ends the session. A failing backend call is only logged: the user and
    /// every stored credential are dropped regardless.
    pub async fn logout(&mut self) {
        if let Err(e) = self.client.logout().await {
            tracing::error!(error = %e, "Logout failed");
        }
        self.user = None;
        self.client.credentials().clear();
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn access(&self) -> Access {
        if self.loading {
            Access::Loading
        } else if self.is_authenticated() {
            Access::Granted
        } else {
            Access::RedirectToLogin
        }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }
}
