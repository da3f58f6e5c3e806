use std::collections::HashMap;

use serde::Serialize;
use vorp_protocol::{normalize, AnalyzedWord, VocabularyStatus};

use crate::span::Span;

/// The user's vocabulary, keyed by base form.
#[derive(Debug, Clone, Default)]
pub struct KnownVocabulary {
    statuses: HashMap<String, VocabularyStatus>,
}

impl KnownVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every word in `words` counts as learned.
    pub fn from_known_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Self::new();
        for word in words {
            vocabulary.insert(word, VocabularyStatus::Learned);
        }
        vocabulary
    }

    pub fn insert(&mut self, base_form: impl Into<String>, status: VocabularyStatus) {
        self.statuses.insert(base_form.into(), status);
    }

    /// Base form first, then the normalized surface form.
    pub fn status_of(&self, word: &AnalyzedWord) -> VocabularyStatus {
        word.base_form
            .as_deref()
            .and_then(|base| self.statuses.get(base))
            .or_else(|| self.statuses.get(&normalize(&word.surface_form)))
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VocabularyStats {
    pub learned: usize,
    pub learning: usize,
    pub unknown: usize,
}

/// Counts every token span (not every distinct word) by status.
pub fn vocabulary_stats(spans: &[Span], known: &KnownVocabulary) -> VocabularyStats {
    let mut stats = VocabularyStats::default();
    for token in spans.iter().filter_map(Span::as_token) {
        match known.status_of(&token.analysis) {
            VocabularyStatus::Learned => stats.learned += 1,
            VocabularyStatus::Learning => stats.learning += 1,
            VocabularyStatus::Unknown => stats.unknown += 1,
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::Annotator;
    use crate::table::AnalysisTable;

    #[test]
    fn test_stats_by_base_form() {
        let table = AnalysisTable::from_words(vec![
            AnalyzedWord::new("먹었다", "to eat").with_base_form("먹다"),
            AnalyzedWord::new("밥을", "rice").with_base_form("밥"),
            AnalyzedWord::new("많이", "a lot"),
        ]);
        let spans = Annotator::new(table).annotate("밥을 많이 먹었다. 밥을!");

        let mut known = KnownVocabulary::from_known_words(["먹다"]);
        known.insert("많이", VocabularyStatus::Learning);

        let stats = vocabulary_stats(&spans, &known);
        assert_eq!(
            stats,
            VocabularyStats {
                learned: 1,
                learning: 1,
                unknown: 2,
            }
        );
    }
}
