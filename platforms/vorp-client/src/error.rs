//! Client error taxonomy

use thiserror::Error;

use crate::forms::ValidationError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected before anything was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Bad credentials, or a missing/expired session
    #[error("{message}")]
    Unauthorized { message: String },

    /// The backend could not be reached
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The backend answered with an error status
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Login succeeded but the profile could not be loaded
    #[error("Could not fetch user profile after login.")]
    ProfileUnavailable(#[source] Box<ClientError>),

    /// The response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }

    /// Short title for a toast; the `Display` text is the description.
    pub fn title(&self) -> &'static str {
        match self {
            ClientError::Validation(e) => e.title(),
            ClientError::Unauthorized { .. } | ClientError::ProfileUnavailable(_) => "Login Failed",
            ClientError::Network(_) => "Connection Problem",
            ClientError::Server { .. } | ClientError::Decode(_) => "Something Went Wrong",
            ClientError::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
