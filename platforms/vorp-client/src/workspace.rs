//! The analysis workspace: content in, annotated and pinnable text out.

use std::sync::Arc;

use rkyv::AlignedVec;
use vorp_annotator::{
    align, fallback_analysis, vocabulary_stats, AnalysisTable, Annotator, Interaction,
    KnownVocabulary, LexiconView, Reaction, ReadingView, VocabularyStats,
};
use vorp_protocol::{AnalyzedWord, GlossId};

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::forms::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Backend,
    /// The backend failed; glosses are local placeholders (or lexicon hits).
    Fallback,
}

pub struct AnalysisWorkspace {
    client: Arc<ApiClient>,
    content: String,
    busy: bool,
    view: Option<ReadingView>,
    source: Option<AnalysisSource>,
    lexicon: Option<AlignedVec>,
    known: KnownVocabulary,
}

impl AnalysisWorkspace {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            content: String::new(),
            busy: false,
            view: None,
            source: None,
            lexicon: None,
            known: KnownVocabulary::new(),
        }
    }

    /// Offline lexicon consulted by the fallback. The archive is validated here.
    pub fn with_lexicon(mut self, bytes: &[u8]) -> Result<Self> {
        let aligned = align(bytes);
        LexiconView::from_bytes(&aligned).map_err(|e| ClientError::Decode(e.to_string()))?;
        self.lexicon = Some(aligned);
        Ok(self)
    }

    pub fn with_known_vocabulary(mut self, known: KnownVocabulary) -> Self {
        self.known = known;
        self
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the submit control is enabled. This is the only guard against
    /// a second submission; [`AnalysisWorkspace::analyze`] does not check it.
    pub fn can_submit(&self) -> bool {
        !self.content.trim().is_empty() && !self.busy
    }

    pub fn view(&self) -> Option<&ReadingView> {
        self.view.as_ref()
    }

    pub fn source(&self) -> Option<AnalysisSource> {
        self.source
    }

    /// Sends the content for analysis. Network and server failures fall back
    /// to a local analysis; an authentication failure is returned.
    pub async fn analyze(&mut self) -> Result<AnalysisSource> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyContent.into());
        }

        self.busy = true;
        let result = self.client.analyze(&self.content).await;
        self.busy = false;

        let (table, source) = match result {
            Ok(response) => {
                tracing::info!(entries = response.analysis.len(), "analysis received");
                (AnalysisTable::from_backend(response.analysis), AnalysisSource::Backend)
            }
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, network = e.is_network(), "analysis failed, using offline fallback");
                (AnalysisTable::from_words(self.fallback_words()), AnalysisSource::Fallback)
            }
        };

        self.view = Some(ReadingView::new(&Annotator::new(table), &self.content));
        self.source = Some(source);
        Ok(source)
    }

    fn fallback_words(&self) -> Vec<AnalyzedWord> {
        let lexicon = self
            .lexicon
            .as_ref()
            .and_then(|bytes| LexiconView::from_bytes(bytes).ok());
        fallback_analysis(&self.content, lexicon.as_ref())
    }

    pub fn interact(&mut self, index: usize, interaction: Interaction) -> Reaction {
        match self.view.as_mut() {
            Some(view) => view.interact(index, interaction),
            None => Reaction::Inert,
        }
    }

    pub fn unpin(&mut self, id: &GlossId) -> bool {
        self.view.as_mut().is_some_and(|view| view.unpin(id))
    }

    pub fn stats(&self) -> Option<VocabularyStats> {
        let view = self.view.as_ref()?;
        Some(vocabulary_stats(view.spans(), &self.known))
    }

    pub fn render_html(&self) -> Option<String> {
        Some(self.view.as_ref()?.render_html(&self.known))
    }

    /// Sends every pinned gloss to the vocabulary endpoint. The pins stay in
    /// place after a successful submission.
    pub async fn submit_for_learning(&mut self) -> Result<usize> {
        let words = self
            .view
            .as_ref()
            .map(|view| view.board().words())
            .unwrap_or_default();

        self.busy = true;
        let result = self.client.update_vocabulary(&words).await;
        self.busy = false;

        match result {
            Ok(()) => {
                tracing::info!(count = words.len(), "vocabulary submitted");
                Ok(words.len())
            }
            Err(e) => {
                match &e {
                    ClientError::Network(source) => {
                        tracing::error!(error = %source, "vocabulary submission failed: backend unreachable")
                    }
                    ClientError::Server { status, message } => {
                        tracing::error!(status, %message, "vocabulary submission rejected by server")
                    }
                    other => tracing::error!(error = %other, "vocabulary submission failed"),
                }
                Err(e)
            }
        }
    }
}
