//! Client side of the VORP backend: the cookie/CSRF wire contract, the auth
//! context, form validation and the analysis workspace.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod forms;
pub mod workspace;

pub use api::UserProfile;
pub use auth::{Access, AuthContext};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use credentials::{CredentialStore, InMemoryCredentials};
pub use error::{ClientError, Result};
pub use forms::{FluencyLevel, Language, LoginForm, PaymentForm, SignUpForm, ValidationError};
pub use workspace::{AnalysisSource, AnalysisWorkspace};
