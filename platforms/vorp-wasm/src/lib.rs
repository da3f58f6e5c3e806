use serde::Serialize;
use vorp_annotator::{
    align, fallback_analysis, AnalysisTable, Annotator, Clock, Interaction, Key,
    KnownVocabulary, LexiconView, Popover, Reaction, ReadingView, WireAnalysis,
};
use vorp_protocol::GlossId;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Browser wall clock.
pub struct DateClock;

impl Clock for DateClock {
    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// What JavaScript receives after an interaction.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReactionReport {
    Inert,
    Pinned { id: String },
    AlreadyPinned { id: String },
    PopoverShown { popover: Popover },
    PopoverHidden,
}

impl From<Reaction> for ReactionReport {
    fn from(reaction: Reaction) -> Self {
        match reaction {
            Reaction::Inert => ReactionReport::Inert,
            Reaction::Pinned(id) => ReactionReport::Pinned { id: id.to_string() },
            Reaction::AlreadyPinned(id) => ReactionReport::AlreadyPinned { id: id.to_string() },
            Reaction::PopoverShown(popover) => ReactionReport::PopoverShown { popover },
            Reaction::PopoverHidden => ReactionReport::PopoverHidden,
        }
    }
}

/// Maps a DOM event name (`click`, `mouseenter`, `keydown:Enter`, ...) to an interaction.
pub fn parse_interaction(event: &str) -> Option<Interaction> {
    let interaction = match event {
        "click" => Interaction::Click,
        "mouseenter" | "focus" => Interaction::HoverStart,
        "mouseleave" | "blur" => Interaction::HoverEnd,
        "keydown:Enter" => Interaction::Key(Key::Enter),
        "keydown: " | "keydown:Space" => Interaction::Key(Key::Space),
        "keydown:Escape" => Interaction::Key(Key::Escape),
        other => {
            let key = other.strip_prefix("keydown:")?;
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Interaction::Key(Key::Other(c)),
                _ => return None,
            }
        }
    };
    Some(interaction)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

/// Annotator plus the reading view of the last annotated text.
#[wasm_bindgen]
pub struct VorpAnnotator {
    annotator: Annotator,
    view: ReadingView<DateClock>,
    known: KnownVocabulary,
}

impl VorpAnnotator {
    fn from_table(table: AnalysisTable) -> VorpAnnotator {
        let annotator = Annotator::new(table);
        let view = ReadingView::with_clock(&annotator, "", DateClock);
        VorpAnnotator {
            annotator,
            view,
            known: KnownVocabulary::new(),
        }
    }
}

#[wasm_bindgen]
impl VorpAnnotator {
    /// Builds the table from the backend's `analysis` object; collisions are
    /// resolved in the object's key order.
    #[wasm_bindgen(constructor)]
    pub fn new(analysis: JsValue) -> Result<VorpAnnotator, JsError> {
        let analysis: WireAnalysis = serde_wasm_bindgen::from_value(analysis)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self::from_table(AnalysisTable::from_backend(analysis)))
    }

    /// Local analysis of `text` for when the backend is unreachable.
    /// `lexicon` is an optional compiled lexicon archive. The text is
    /// annotated right away.
    pub fn offline(text: &str, lexicon: Option<Vec<u8>>) -> Result<VorpAnnotator, JsError> {
        let words = match lexicon {
            Some(bytes) => {
                let aligned = align(&bytes);
                let view = LexiconView::from_bytes(&aligned).map_err(|e| JsError::new(&e.to_string()))?;
                fallback_analysis(text, Some(&view))
            }
            None => fallback_analysis(text, None),
        };
        let mut annotator = Self::from_table(AnalysisTable::from_words(words));
        annotator.view = ReadingView::with_clock(&annotator.annotator, text, DateClock);
        Ok(annotator)
    }

    /// Marks these base forms as already learned for rendering.
    #[wasm_bindgen(js_name = setKnownWords)]
    pub fn set_known_words(&mut self, words: Vec<String>) {
        self.known = KnownVocabulary::from_known_words(words);
    }

    /// Annotates `text`, replacing the current view and its pins.
    pub fn annotate(&mut self, text: &str) -> Result<JsValue, JsError> {
        self.view = ReadingView::with_clock(&self.annotator, text, DateClock);
        self.spans()
    }

    pub fn spans(&self) -> Result<JsValue, JsError> {
        to_js(&self.view.spans())
    }

    /// Dispatches a DOM event on the span at `index`.
    pub fn interact(&mut self, index: usize, event: &str) -> Result<JsValue, JsError> {
        let reaction = match parse_interaction(event) {
            Some(interaction) => self.view.interact(index, interaction),
            None => Reaction::Inert,
        };
        to_js(&ReactionReport::from(reaction))
    }

    pub fn unpin(&mut self, id: &str) -> Result<bool, JsError> {
        let id = GlossId::parse(id).ok_or_else(|| JsError::new("malformed gloss id"))?;
        Ok(self.view.unpin(&id))
    }

    pub fn pins(&self) -> Result<JsValue, JsError> {
        to_js(&self.view.board().pins())
    }

    #[wasm_bindgen(js_name = isPanelOpen)]
    pub fn is_panel_open(&self) -> bool {
        self.view.board().is_panel_open()
    }

    #[wasm_bindgen(js_name = renderHtml)]
    pub fn render_html(&self) -> String {
        self.view.render_html(&self.known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dom_events() {
        assert_eq!(parse_interaction("click"), Some(Interaction::Click));
        assert_eq!(parse_interaction("keydown:Enter"), Some(Interaction::Key(Key::Enter)));
        assert_eq!(parse_interaction("keydown: "), Some(Interaction::Key(Key::Space)));
        assert_eq!(parse_interaction("keydown:a"), Some(Interaction::Key(Key::Other('a'))));
        assert_eq!(parse_interaction("keydown:Tab"), None);
        assert_eq!(parse_interaction("scroll"), None);
    }

    #[test]
    fn test_reaction_report_carries_id() {
        let id = GlossId::new("风", 7);
        assert_eq!(
            ReactionReport::from(Reaction::Pinned(id)),
            ReactionReport::Pinned { id: "风-7".to_string() }
        );
    }
}
