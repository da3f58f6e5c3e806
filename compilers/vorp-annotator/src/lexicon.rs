use rkyv::{AlignedVec, Deserialize, Infallible};
use vorp_protocol::{normalize, AnalyzedWord, ArchivedLexicon, Lexicon, LexiconEntry};

use crate::error::AnnotatorError;

/// Builds a lexicon from glosses: keys are normalized, entries with an empty
/// key are dropped, and the first gloss per key wins.
pub fn compile_lexicon<I: IntoIterator<Item = AnalyzedWord>>(version: u32, words: I) -> Lexicon {
    let mut entries: Vec<LexiconEntry> = words
        .into_iter()
        .filter_map(|mut word| {
            let key = normalize(&word.surface_form);
            if key.is_empty() {
                return None;
            }
            word.surface_form = key.clone();
            Some(LexiconEntry { key, word })
        })
        .collect();

    // Stable sort keeps input order among equal keys
    entries.sort_by(|a, b| a.key.cmp(&b.key));
    entries.dedup_by(|later, earlier| later.key == earlier.key);

    Lexicon { version, entries }
}

/// Copies raw bytes (from a file or `fetch()`) into a buffer aligned for rkyv.
pub fn align(bytes: &[u8]) -> AlignedVec {
    let mut aligned = AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);
    aligned
}

/// Zero-copy view over an archived lexicon.
#[derive(Clone, Copy)]
pub struct LexiconView<'a> {
    archived: &'a ArchivedLexicon,
}

impl<'a> LexiconView<'a> {
    /// Validates the archive. `bytes` must be aligned, see [`align`].
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, AnnotatorError> {
        let archived = rkyv::check_archived_root::<Lexicon>(bytes)
            .map_err(|e| AnnotatorError::InvalidLexicon(e.to_string()))?;
        Ok(Self { archived })
    }

    pub fn version(&self) -> u32 {
        self.archived.version
    }

    pub fn len(&self) -> usize {
        self.archived.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archived.entries.is_empty()
    }

    /// Binary search by normalized key.
    pub fn lookup(&self, key: &str) -> Option<AnalyzedWord> {
        let entries = &self.archived.entries;
        let index = entries
            .binary_search_by(|entry| entry.key.as_str().cmp(key))
            .ok()?;
        entries[index].word.deserialize(&mut Infallible).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rkyv::to_bytes;

    #[test]
    fn test_compile_sorts_and_dedups() {
        let lexicon = compile_lexicon(
            2,
            vec![
                AnalyzedWord::new("world!", "Welt"),
                AnalyzedWord::new("...", "dots"),
                AnalyzedWord::new("Hello", "Hallo"),
                AnalyzedWord::new("world", "later duplicate"),
            ],
        );

        let keys: Vec<&str> = lexicon.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["Hello", "world"]);
        assert_eq!(lexicon.entries[1].word.meaning, "Welt");
        assert_eq!(lexicon.entries[1].word.surface_form, "world");
    }

    #[test]
    fn test_archived_lookup() {
        let lexicon = compile_lexicon(
            1,
            vec![
                AnalyzedWord::new("风", "wind").with_part_of_speech("noun"),
                AnalyzedWord::new("急", "urgent"),
            ],
        );
        let bytes = to_bytes::<_, 256>(&lexicon).unwrap();
        let view = LexiconView::from_bytes(&bytes).unwrap();

        assert_eq!(view.version(), 1);
        assert_eq!(view.len(), 2);
        assert_eq!(view.lookup("急").unwrap().meaning, "urgent");
        assert_eq!(view.lookup("风").unwrap().part_of_speech.as_deref(), Some("noun"));
        assert!(view.lookup("雨").is_none());
    }

    #[test]
    fn test_rejects_garbage() {
        let bytes = align(&[0xFF; 3]);
        assert!(LexiconView::from_bytes(&bytes).is_err());
    }
}
