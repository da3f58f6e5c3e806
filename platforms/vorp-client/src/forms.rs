//! Form validation. Invalid forms never reach the backend.

use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}")]
    MissingFields(&'static str),

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters.")]
    PasswordTooShort { min: usize },

    #[error("Paste some text to analyze.")]
    EmptyContent,
}

impl ValidationError {
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::MissingFields(_) | ValidationError::EmptyContent => "Missing Information",
            ValidationError::PasswordMismatch => "Password Mismatch",
            ValidationError::PasswordTooShort { .. } => "Password Too Short",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields(
                "Please enter both email and password.",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Japanese,
    Korean,
    Chinese,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Portuguese,
        Language::Japanese,
        Language::Korean,
        Language::Chinese,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Chinese => "zh",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::Chinese => "Chinese",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|l| l.code() == code)
    }
}

/// CEFR levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FluencyLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl FluencyLevel {
    pub const ALL: [FluencyLevel; 6] = [
        FluencyLevel::A1,
        FluencyLevel::A2,
        FluencyLevel::B1,
        FluencyLevel::B2,
        FluencyLevel::C1,
        FluencyLevel::C2,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FluencyLevel::A1 => "Beginner (A1)",
            FluencyLevel::A2 => "Elementary (A2)",
            FluencyLevel::B1 => "Intermediate (B1)",
            FluencyLevel::B2 => "Upper Intermediate (B2)",
            FluencyLevel::C1 => "Advanced (C1)",
            FluencyLevel::C2 => "Proficient (C2)",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub mother_language: Option<Language>,
    pub target_language: Option<Language>,
    pub fluency_level: Option<FluencyLevel>,
}

impl SignUpForm {
    /// Checks, in order: every field present, passwords match, password length.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
            || self.mother_language.is_none()
            || self.target_language.is_none()
            || self.fluency_level.is_none()
        {
            return Err(ValidationError::MissingFields("Please fill in all fields."));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub name_on_card: String,
    pub email: String,
}

impl PaymentForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            &self.card_number,
            &self.expiry_date,
            &self.cvv,
            &self.name_on_card,
            &self.email,
        ];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(ValidationError::MissingFields(
                "Please fill in all payment details.",
            ));
        }
        Ok(())
    }
}
