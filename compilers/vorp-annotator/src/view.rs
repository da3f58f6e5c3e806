use serde::Serialize;
use vorp_protocol::{AnalyzedWord, GlossId};

use crate::annotator::Annotator;
use crate::pins::{Clock, PinBoard, PinOutcome, SystemClock};
use crate::render::render_html;
use crate::span::Span;
use crate::vocabulary::KnownVocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Click,
    Key(Key),
    HoverStart,
    HoverEnd,
}

/// Transient gloss shown while a token is hovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popover {
    pub meaning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
}

impl From<&AnalyzedWord> for Popover {
    fn from(word: &AnalyzedWord) -> Self {
        Self {
            meaning: word.meaning.clone(),
            base_form: word.base_form.clone(),
            part_of_speech: word.part_of_speech.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Plain span, unknown index, or an unbound key.
    Inert,
    Pinned(GlossId),
    AlreadyPinned(GlossId),
    PopoverShown(Popover),
    PopoverHidden,
}

impl From<PinOutcome> for Reaction {
    fn from(outcome: PinOutcome) -> Self {
        match outcome {
            PinOutcome::Pinned(id) => Reaction::Pinned(id),
            PinOutcome::AlreadyPinned(id) => Reaction::AlreadyPinned(id),
        }
    }
}

/// An annotated text together with its pin board and hover state.
pub struct ReadingView<C: Clock = SystemClock> {
    spans: Vec<Span>,
    board: PinBoard,
    hovered: Option<usize>,
    clock: C,
}

impl ReadingView<SystemClock> {
    pub fn new(annotator: &Annotator, text: &str) -> Self {
        Self::with_clock(annotator, text, SystemClock)
    }
}

impl<C: Clock> ReadingView<C> {
    pub fn with_clock(annotator: &Annotator, text: &str, clock: C) -> Self {
        Self {
            spans: annotator.annotate(text),
            board: PinBoard::new(),
            hovered: None,
            clock,
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn board(&self) -> &PinBoard {
        &self.board
    }

    /// Dispatches a user interaction on the span at `index`.
    pub fn interact(&mut self, index: usize, interaction: Interaction) -> Reaction {
        let Some(token) = self.spans.get(index).and_then(Span::as_token) else {
            return Reaction::Inert;
        };

        match interaction {
            Interaction::Click | Interaction::Key(Key::Enter) | Interaction::Key(Key::Space) => {
                let word = token.analysis.clone();
                self.board.pin(&word, &self.clock).into()
            }
            Interaction::Key(_) => Reaction::Inert,
            Interaction::HoverStart => {
                let popover = Popover::from(&token.analysis);
                self.hovered = Some(index);
                Reaction::PopoverShown(popover)
            }
            Interaction::HoverEnd if self.hovered == Some(index) => {
                self.hovered = None;
                Reaction::PopoverHidden
            }
            Interaction::HoverEnd => Reaction::Inert,
        }
    }

    /// Pins the word directly, as clicking any of its tokens would.
    pub fn pin(&mut self, word: &AnalyzedWord) -> PinOutcome {
        self.board.pin(word, &self.clock)
    }

    pub fn unpin(&mut self, id: &GlossId) -> bool {
        self.board.unpin(id)
    }

    pub fn unpin_observed(&mut self, id: &GlossId, observed_len: usize) -> bool {
        self.board.unpin_observed(id, observed_len)
    }

    pub fn popover(&self) -> Option<Popover> {
        let token = self.spans.get(self.hovered?)?.as_token()?;
        Some(Popover::from(&token.analysis))
    }

    /// Persistent emphasis for tokens whose word is pinned.
    pub fn is_highlighted(&self, index: usize) -> bool {
        self.spans
            .get(index)
            .and_then(Span::as_token)
            .is_some_and(|t| self.board.is_highlighted(&t.key))
    }

    /// Index of the first token whose normalized key is `key`.
    pub fn find_token(&self, key: &str) -> Option<usize> {
        self.spans
            .iter()
            .position(|s| s.as_token().is_some_and(|t| t.key == key))
    }

    pub fn render_html(&self, known: &KnownVocabulary) -> String {
        render_html(&self.spans, &self.board, known)
    }
}
