//! Wire types for the backend endpoints.

use serde::{Deserialize, Serialize};
use vorp_annotator::WireAnalysis;
use vorp_protocol::AnalyzedWord;

pub const LOGIN: &str = "/api/login/";
pub const CSRF_TOKEN: &str = "/api/get-csrf-token/";
pub const USER_PROFILE: &str = "/api/user_profile_view/";
pub const LOGOUT: &str = "/api/logout/";
pub const ANALYZE: &str = "/api/analyze/";
pub const UPDATE_VOCABULARY: &str = "/api/update_vocabulary/";

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    /// Base forms the user already knows.
    #[serde(default, alias = "kownwords")]
    pub known_words: Vec<String>,
    #[serde(default)]
    pub mother_language: String,
    #[serde(default)]
    pub target_language: String,
    #[serde(default, alias = "fluncyLevel")]
    pub fluency_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub content: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeResponse {
    /// Surface form (possibly punctuated) to gloss, in wire order.
    #[serde(default)]
    pub analysis: WireAnalysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct VocabularyUpdate<'a> {
    pub words: &'a [AnalyzedWord],
}

/// Error payloads seen from the backend: `{"error": ..}`, `{"detail": ..}` or `{"message": ..}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn message(self) -> Option<String> {
        self.error
            .or(self.detail)
            .or(self.message)
            .filter(|m| !m.trim().is_empty())
    }
}
