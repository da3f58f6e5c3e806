use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::pins::PinBoard;
use crate::span::Span;
use crate::vocabulary::KnownVocabulary;

pub const TOKEN_CLASS: &str = "vorp-token";
pub const PINNED_CLASS: &str = "vorp-pinned";

/// Renders spans as HTML. Plain text is escaped; tokens become focusable
/// buttons carrying their gloss in `data-*` attributes.
pub fn render_html(spans: &[Span], board: &PinBoard, known: &KnownVocabulary) -> String {
    let mut html = String::new();

    for span in spans {
        let token = match span {
            Span::Plain(plain) => {
                html.push_str(&encode_text(&plain.text));
                continue;
            }
            Span::Token(token) => token,
        };

        let word = &token.analysis;
        let status = known.status_of(word);
        let mut class = format!("{TOKEN_CLASS} word-{}", status.as_str());
        if board.is_highlighted(&token.key) {
            class.push(' ');
            class.push_str(PINNED_CLASS);
        }

        html.push_str(&format!(
            "<span class=\"{}\" role=\"button\" tabindex=\"0\" data-word=\"{}\" data-meaning=\"{}\"",
            class,
            encode_double_quoted_attribute(&word.surface_form),
            encode_double_quoted_attribute(&word.meaning),
        ));
        if let Some(base) = &word.base_form {
            html.push_str(&format!(" data-base-form=\"{}\"", encode_double_quoted_attribute(base)));
        }
        if let Some(pos) = &word.part_of_speech {
            html.push_str(&format!(
                " data-part-of-speech=\"{}\"",
                encode_double_quoted_attribute(pos)
            ));
        }
        html.push('>');
        html.push_str(&encode_text(&token.text));
        html.push_str("</span>");
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::Annotator;
    use crate::pins::SystemClock;
    use crate::table::AnalysisTable;
    use vorp_protocol::AnalyzedWord;

    #[test]
    fn test_render_escapes_and_marks_pins() {
        let word = AnalyzedWord::new("fish", "a \"swimmer\"").with_part_of_speech("noun");
        let spans = Annotator::new(AnalysisTable::from_words(vec![word.clone()])).annotate("<b> fish&chips fish");

        let mut board = PinBoard::new();
        board.pin(&word, &SystemClock);

        let html = render_html(&spans, &board, &KnownVocabulary::new());
        assert!(html.starts_with("&lt;b&gt; fish&amp;chips "));
        assert!(html.ends_with(
            "<span class=\"vorp-token word-unknown vorp-pinned\" role=\"button\" tabindex=\"0\" \
             data-word=\"fish\" data-meaning=\"a &quot;swimmer&quot;\" data-part-of-speech=\"noun\">fish</span>"
        ));
    }
}
