//! Content annotation: splits text into spans, attaches glosses from an
//! analysis table, and tracks the glosses a reader pins.

pub mod annotator;
pub mod error;
pub mod fallback;
pub mod lexicon;
pub mod pins;
pub mod render;
pub mod segment;
pub mod span;
pub mod table;
pub mod view;
pub mod vocabulary;

pub use annotator::Annotator;
pub use error::AnnotatorError;
pub use fallback::{fallback_analysis, PLACEHOLDER_MEANING};
pub use lexicon::{align, compile_lexicon, LexiconView};
pub use pins::{Clock, PinBoard, PinOutcome, SystemClock};
pub use render::render_html;
pub use segment::{segment, ByteRange, Segment, SegmentKind};
pub use span::{PlainSpan, Span, TokenSpan};
pub use table::{AnalysisTable, Gloss, WireAnalysis};
pub use view::{Interaction, Key, Popover, Reaction, ReadingView};
pub use vocabulary::{vocabulary_stats, KnownVocabulary, VocabularyStats};

#[cfg(test)]
mod tests {
    use super::*;
    use vorp_protocol::AnalyzedWord;

    #[test]
    fn test_backend_response_integration() {
        // 1. Decode the backend mapping as it arrives on the wire
        let analysis: WireAnalysis = serde_json::from_str(
            r#"{"风":{"meaning":"wind","base":"风","partOfSpeech":"noun"}}"#,
        )
        .unwrap();

        // 2. Annotate
        let annotator = Annotator::new(AnalysisTable::from_backend(analysis));
        let mut view = ReadingView::new(&annotator, "风急");

        // 3. Interact
        assert!(matches!(view.interact(0, Interaction::Click), Reaction::Pinned(_)));
        assert_eq!(view.interact(1, Interaction::Click), Reaction::Inert);

        let pins = view.board().pins();
        assert_eq!(pins.len(), 1);
        assert_eq!(
            pins[0].word,
            AnalyzedWord::new("风", "wind")
                .with_base_form("风")
                .with_part_of_speech("noun")
        );
        let json = serde_json::to_value(&pins[0].word).unwrap();
        assert_eq!(json["word"], "风");
        assert_eq!(json["baseForm"], "风");
    }

    #[test]
    fn test_fallback_table_keeps_text_interactive() {
        let table = AnalysisTable::from_words(fallback_analysis("Hello world", None));
        let annotator = Annotator::new(table);
        let spans = annotator.annotate("Hello world");

        assert_eq!(spans.iter().filter(|s| s.is_token()).count(), 2);
        let hello = spans[0].as_token().unwrap();
        assert_eq!(hello.analysis.base_form.as_deref(), Some("hello"));
        assert_eq!(hello.analysis.meaning, PLACEHOLDER_MEANING);
    }
}
