use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotatorError {
    #[error("Invalid lexicon archive: {0}")]
    InvalidLexicon(String),
}
