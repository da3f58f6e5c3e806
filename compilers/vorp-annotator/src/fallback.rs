use std::collections::HashSet;

use vorp_protocol::{normalize, AnalyzedWord, SegmentationMode};

use crate::lexicon::LexiconView;
use crate::segment::{segment, SegmentKind};

pub const PLACEHOLDER_MEANING: &str = "(offline) no translation available";

/// Degraded-mode stand-in for the backend analysis: one word per distinct
/// normalized segment, so the text stays interactive while offline. This is
/// not a linguistic analyzer.
pub fn fallback_analysis(text: &str, lexicon: Option<&LexiconView<'_>>) -> Vec<AnalyzedWord> {
    let mode = SegmentationMode::detect(text);
    let mut seen = HashSet::new();
    let mut words = Vec::new();

    for seg in segment(text, mode) {
        if seg.kind == SegmentKind::Whitespace {
            continue;
        }
        let key = normalize(seg.text);
        if key.is_empty() || !seen.insert(key.clone()) {
            continue;
        }
        let word = lexicon
            .and_then(|l| l.lookup(&key))
            .unwrap_or_else(|| placeholder(&key));
        words.push(word);
    }

    tracing::debug!(?mode, words = words.len(), "synthesized fallback analysis");
    words
}

fn placeholder(key: &str) -> AnalyzedWord {
    AnalyzedWord::new(key, PLACEHOLDER_MEANING).with_base_form(key.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::compile_lexicon;
    use rkyv::to_bytes;

    #[test]
    fn test_hello_world() {
        let words = fallback_analysis("Hello world", None);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].surface_form, "Hello");
        assert_eq!(words[0].base_form.as_deref(), Some("hello"));
        assert_eq!(words[1].surface_form, "world");
        assert_eq!(words[1].base_form.as_deref(), Some("world"));
        assert_eq!(words[0].meaning, PLACEHOLDER_MEANING);
        assert_eq!(words[0].part_of_speech, None);
    }

    #[test]
    fn test_dedups_and_skips_punctuation() {
        let words = fallback_analysis("Hi, hi! Hi? — …", None);
        let surfaces: Vec<&str> = words.iter().map(|w| w.surface_form.as_str()).collect();
        assert_eq!(surfaces, vec!["Hi", "hi"]);
    }

    #[test]
    fn test_character_mode_fallback() {
        let words = fallback_analysis("风急风。", None);
        let surfaces: Vec<&str> = words.iter().map(|w| w.surface_form.as_str()).collect();
        assert_eq!(surfaces, vec!["风", "急"]);
    }

    #[test]
    fn test_lexicon_hit_replaces_placeholder() {
        let lexicon = compile_lexicon(1, vec![AnalyzedWord::new("world", "Welt").with_base_form("world")]);
        let bytes = to_bytes::<_, 256>(&lexicon).unwrap();
        let view = LexiconView::from_bytes(&bytes).unwrap();

        let words = fallback_analysis("Hello world", Some(&view));
        assert_eq!(words[0].meaning, PLACEHOLDER_MEANING);
        assert_eq!(words[1].meaning, "Welt");
    }
}
