use serde::Serialize;
use vorp_protocol::AnalyzedWord;

use crate::segment::ByteRange;

/// Inert text: whitespace, punctuation, or a word with no gloss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlainSpan {
    pub range: ByteRange,
    pub text: String,
}

/// An interactive word carrying its gloss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSpan {
    pub range: ByteRange,
    pub text: String,
    /// Normalized lookup key, also the highlight key.
    pub key: String,
    pub analysis: AnalyzedWord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Span {
    Plain(PlainSpan),
    Token(TokenSpan),
}

impl Span {
    pub fn text(&self) -> &str {
        match self {
            Span::Plain(p) => &p.text,
            Span::Token(t) => &t.text,
        }
    }

    pub fn range(&self) -> ByteRange {
        match self {
            Span::Plain(p) => p.range,
            Span::Token(t) => t.range,
        }
    }

    pub fn as_token(&self) -> Option<&TokenSpan> {
        match self {
            Span::Token(t) => Some(t),
            Span::Plain(_) => None,
        }
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Span::Token(_))
    }
}
