use vorp_protocol::SegmentationMode;

use crate::segment::{segment, Segment, SegmentKind};
use crate::span::{PlainSpan, Span, TokenSpan};
use crate::table::AnalysisTable;

/// Turns raw text into spans using an analysis table.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    table: AnalysisTable,
}

impl Annotator {
    pub fn new(table: AnalysisTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &AnalysisTable {
        &self.table
    }

    /// Primary entry point: Text -> Spans
    pub fn annotate(&self, text: &str) -> Vec<Span> {
        let mode = SegmentationMode::detect(text);
        let spans: Vec<Span> = segment(text, mode)
            .into_iter()
            .map(|seg| self.resolve(seg, mode))
            .collect();

        tracing::debug!(
            ?mode,
            spans = spans.len(),
            tokens = spans.iter().filter(|s| s.is_token()).count(),
            "annotated text"
        );
        spans
    }

    fn resolve(&self, seg: Segment<'_>, mode: SegmentationMode) -> Span {
        let hit = match (seg.kind, mode) {
            (SegmentKind::Whitespace, _) => None,
            // Single characters are looked up as they are
            (SegmentKind::Text, SegmentationMode::Character) => self
                .table
                .get(seg.text)
                .map(|word| (seg.text.to_string(), word)),
            (SegmentKind::Text, SegmentationMode::Token) => self.table.lookup(seg.text),
        };

        match hit {
            Some((key, word)) => Span::Token(TokenSpan {
                range: seg.range,
                text: seg.text.to_string(),
                key,
                analysis: word.clone(),
            }),
            None => Span::Plain(PlainSpan {
                range: seg.range,
                text: seg.text.to_string(),
            }),
        }
    }
}
