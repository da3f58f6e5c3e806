use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use vorp_protocol::{normalize, AnalyzedWord};

/// One entry of the backend's analysis mapping, as sent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gloss {
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default, rename = "partOfSpeech")]
    pub part_of_speech: Option<String>,
}

impl Gloss {
    fn into_word(self, surface_form: String) -> AnalyzedWord {
        AnalyzedWord {
            surface_form,
            meaning: self.meaning,
            base_form: self.base.filter(|b| !b.is_empty()),
            part_of_speech: self.part_of_speech.filter(|p| !p.is_empty()),
        }
    }
}

/// The backend's `analysis` object with its entries in wire order, so that
/// "first seen" in [`AnalysisTable::from_backend`] means first on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireAnalysis(pub Vec<(String, Gloss)>);

impl WireAnalysis {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for WireAnalysis {
    type Item = (String, Gloss);
    type IntoIter = std::vec::IntoIter<(String, Gloss)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'de> Deserialize<'de> for WireAnalysis {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = WireAnalysis;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from surface forms to glosses")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<WireAnalysis, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Gloss>()? {
                    entries.push(entry);
                }
                Ok(WireAnalysis(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[derive(Debug, Clone)]
struct TableEntry {
    word: AnalyzedWord,
    // The raw key was already in normal form
    exact: bool,
}

/// Glosses keyed by normalized surface form.
#[derive(Debug, Clone, Default)]
pub struct AnalysisTable {
    entries: HashMap<String, TableEntry>,
}

impl AnalysisTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from the backend's `analysis` mapping. Keys are
    /// normalized first since the backend may leave punctuation on them.
    pub fn from_backend<I, K>(analysis: I) -> Self
    where
        I: IntoIterator<Item = (K, Gloss)>,
        K: AsRef<str>,
    {
        let mut table = Self::new();
        for (raw_key, gloss) in analysis {
            let key = normalize(raw_key.as_ref());
            if key.is_empty() {
                continue;
            }
            let exact = key == raw_key.as_ref();
            table.insert_entry(key.clone(), gloss.into_word(key), exact);
        }
        table
    }

    /// Builds the table from already analyzed words, keyed by their normalized
    /// surface forms.
    pub fn from_words<I: IntoIterator<Item = AnalyzedWord>>(words: I) -> Self {
        let mut table = Self::new();
        for word in words {
            table.insert(word);
        }
        table
    }

    /// Returns false when the word normalizes to nothing and was dropped.
    pub fn insert(&mut self, mut word: AnalyzedWord) -> bool {
        let key = normalize(&word.surface_form);
        if key.is_empty() {
            return false;
        }
        let exact = key == word.surface_form;
        word.surface_form = key.clone();
        self.insert_entry(key, word, exact);
        true
    }

    /// Collisions keep an exact-key entry over a punctuated one, otherwise the first seen.
    fn insert_entry(&mut self, key: String, word: AnalyzedWord, exact: bool) {
        match self.entries.get(&key) {
            Some(existing) if existing.exact || !exact => {}
            _ => {
                self.entries.insert(key, TableEntry { word, exact });
            }
        }
    }

    /// Exact lookup by an already normalized key.
    pub fn get(&self, key: &str) -> Option<&AnalyzedWord> {
        self.entries.get(key).map(|e| &e.word)
    }

    /// Normalizes `surface` and looks it up. Punctuation-only input never hits.
    pub fn lookup(&self, surface: &str) -> Option<(String, &AnalyzedWord)> {
        let key = normalize(surface);
        if key.is_empty() {
            return None;
        }
        let word = self.get(&key)?;
        Some((key, word))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &AnalyzedWord> {
        self.entries.values().map(|e| &e.word)
    }
}
