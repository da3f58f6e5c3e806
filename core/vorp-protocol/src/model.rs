use alloc::string::String;
use alloc::vec::Vec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::ids::GlossId;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// The gloss of one distinct word, keyed by its normalized surface form.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[archive(check_bytes)]
pub struct AnalyzedWord {
    #[cfg_attr(feature = "serde", serde(rename = "word"))]
    pub surface_form: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub meaning: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub base_form: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub part_of_speech: Option<String>,
}

impl AnalyzedWord {
    pub fn new(surface_form: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            surface_form: surface_form.into(),
            meaning: meaning.into(),
            base_form: None,
            part_of_speech: None,
        }
    }

    pub fn with_base_form(mut self, base_form: impl Into<String>) -> Self {
        self.base_form = Some(base_form.into());
        self
    }

    pub fn with_part_of_speech(mut self, part_of_speech: impl Into<String>) -> Self {
        self.part_of_speech = Some(part_of_speech.into());
        self
    }
}

/// A gloss the user pinned to the side panel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct PinnedGloss {
    pub id: GlossId,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub word: AnalyzedWord,
}

impl PinnedGloss {
    pub fn surface_form(&self) -> &str {
        &self.word.surface_form
    }
}

/// How well the user knows a word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VocabularyStatus {
    Learned,
    Learning,
    #[default]
    Unknown,
}

impl VocabularyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VocabularyStatus::Learned => "learned",
            VocabularyStatus::Learning => "learning",
            VocabularyStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct LexiconEntry {
    /// Normalized surface form.
    pub key: String,
    pub word: AnalyzedWord,
}

/// Offline glosses. Entries are sorted by `key` with no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Lexicon {
    pub version: u32,
    pub entries: Vec<LexiconEntry>,
}
