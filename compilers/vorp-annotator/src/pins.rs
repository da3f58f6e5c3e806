use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

use vorp_protocol::{normalize, AnalyzedWord, GlossId, PinnedGloss};

/// Source of gloss creation timestamps.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinOutcome {
    Pinned(GlossId),
    /// A gloss with the same surface form was already pinned.
    AlreadyPinned(GlossId),
}

impl PinOutcome {
    pub fn id(&self) -> &GlossId {
        match self {
            PinOutcome::Pinned(id) | PinOutcome::AlreadyPinned(id) => id,
        }
    }
}

/// The side panel: pinned glosses, their highlight keys, and whether the
/// panel is open.
#[derive(Debug, Clone, Default)]
pub struct PinBoard {
    pins: Vec<PinnedGloss>,
    highlights: BTreeSet<String>,
    panel_open: bool,
}

impl PinBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `word` unless a gloss with the same surface form is already
    /// pinned. Opens the panel either way.
    pub fn pin(&mut self, word: &AnalyzedWord, clock: &dyn Clock) -> PinOutcome {
        self.panel_open = true;

        if let Some(existing) = self
            .pins
            .iter()
            .find(|p| p.word.surface_form == word.surface_form)
        {
            return PinOutcome::AlreadyPinned(existing.id.clone());
        }

        let id = GlossId::new(word.surface_form.clone(), clock.now_millis());
        self.highlights.insert(normalize(&word.surface_form));
        self.pins.push(PinnedGloss {
            id: id.clone(),
            word: word.clone(),
        });
        PinOutcome::Pinned(id)
    }

    /// Removes the gloss with `id`. The panel closes when exactly one gloss
    /// was pinned before the removal.
    pub fn unpin(&mut self, id: &GlossId) -> bool {
        let observed_len = self.pins.len();
        self.unpin_observed(id, observed_len)
    }

    /// Like [`PinBoard::unpin`], but decides about the panel from a list
    /// length observed earlier, as a handler bound to an older render does.
    /// Two removals that both observed two pins leave the panel open and empty.
    /// An id that is no longer pinned leaves the highlights untouched.
    pub fn unpin_observed(&mut self, id: &GlossId, observed_len: usize) -> bool {
        let removed = match self.pins.iter().position(|p| &p.id == id) {
            Some(pos) => {
                let gone = self.pins.remove(pos);
                self.highlights.remove(&normalize(gone.surface_form()));
                true
            }
            None => false,
        };

        if observed_len == 1 {
            self.panel_open = false;
        }
        removed
    }

    pub fn pins(&self) -> &[PinnedGloss] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn set_panel_open(&mut self, open: bool) {
        self.panel_open = open;
    }

    pub fn highlights(&self) -> &BTreeSet<String> {
        &self.highlights
    }

    pub fn is_highlighted(&self, key: &str) -> bool {
        self.highlights.contains(key)
    }

    /// The pinned glosses as words, in pin order, for vocabulary submission.
    pub fn words(&self) -> Vec<AnalyzedWord> {
        self.pins.iter().map(|p| p.word.clone()).collect()
    }
}
