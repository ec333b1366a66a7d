//! Multi-document registry.
//!
//! [`DocumentManager`] owns one [`DocumentSession`] per open document, all sharing one
//! [`Settings`] value. Documents in an excluded language are refused at open time, and a
//! settings reload closes the ones whose language became excluded.

use crate::error::OpenError;
use crate::session::{DocumentSession, PassOutcome};
use crate::settings::Settings;
use crate::token::Tokenizer;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Opaque identifier for a document in a [`DocumentManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Supplies a tokenizer for a language id.
pub trait TokenizerProvider {
    /// Tokenizer type handed to sessions.
    type Tokenizer: Tokenizer;

    /// A fresh tokenizer for `language`, or `None` if the language is not supported.
    fn tokenizer_for(&self, language: &str) -> Option<Self::Tokenizer>;
}

impl<F, T> TokenizerProvider for F
where
    F: Fn(&str) -> Option<T>,
    T: Tokenizer,
{
    type Tokenizer = T;

    fn tokenizer_for(&self, language: &str) -> Option<T> {
        self(language)
    }
}

struct Document<T: Tokenizer> {
    language: String,
    session: DocumentSession<T>,
}

/// A collection of open documents.
pub struct DocumentManager<P: TokenizerProvider> {
    settings: Arc<Settings>,
    provider: P,
    next_id: u64,
    documents: BTreeMap<DocumentId, Document<P::Tokenizer>>,
}

impl<P: TokenizerProvider> fmt::Debug for DocumentManager<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentManager")
            .field("document_count", &self.documents.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<P: TokenizerProvider> DocumentManager<P> {
    /// Create an empty manager.
    pub fn new(settings: Arc<Settings>, provider: P) -> Self {
        Self {
            settings,
            provider,
            next_id: 0,
            documents: BTreeMap::new(),
        }
    }

    /// Open a document and run its first pass.
    pub fn open(
        &mut self,
        language: &str,
        text: impl Into<String>,
    ) -> Result<DocumentId, OpenError> {
        if self.settings.is_language_excluded(language) {
            tracing::info!(target: "brackets.manager", language, "open_excluded");
            return Err(OpenError::Excluded(language.to_string()));
        }
        let tokenizer = self
            .provider
            .tokenizer_for(language)
            .ok_or_else(|| OpenError::Unsupported(language.to_string()))?;

        let id = DocumentId(self.next_id);
        self.next_id += 1;

        let mut session = DocumentSession::new(Arc::clone(&self.settings), tokenizer, text);
        session.refresh();
        tracing::info!(
            target: "brackets.manager",
            document = %id,
            language,
            lines = session.line_count(),
            "document_opened"
        );

        self.documents.insert(
            id,
            Document {
                language: language.to_string(),
                session,
            },
        );
        Ok(id)
    }

    /// Close a document. Returns `false` if it was not open.
    pub fn close(&mut self, id: DocumentId) -> bool {
        let closed = self.documents.remove(&id).is_some();
        if closed {
            tracing::info!(target: "brackets.manager", document = %id, "document_closed");
        }
        closed
    }

    /// The session of an open document.
    pub fn session(&self, id: DocumentId) -> Option<&DocumentSession<P::Tokenizer>> {
        self.documents.get(&id).map(|doc| &doc.session)
    }

    /// Mutable access to the session of an open document.
    pub fn session_mut(&mut self, id: DocumentId) -> Option<&mut DocumentSession<P::Tokenizer>> {
        self.documents.get_mut(&id).map(|doc| &mut doc.session)
    }

    /// Language id a document was opened with.
    pub fn language(&self, id: DocumentId) -> Option<&str> {
        self.documents.get(&id).map(|doc| doc.language.as_str())
    }

    /// Ids of all open documents, in opening order.
    pub fn ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.documents.keys().copied()
    }

    /// Number of open documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if no document is open.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Shared settings.
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Forward an edit to a document's session.
    ///
    /// Returns `None` for unknown ids and for deferred passes.
    pub fn edit(
        &mut self,
        id: DocumentId,
        start_line: usize,
        text: impl Into<String>,
        now: Instant,
    ) -> Option<PassOutcome> {
        self.session_mut(id)?.edit(start_line, text, now)
    }

    /// Poll every session; returns the passes that ran.
    pub fn poll(&mut self, now: Instant) -> Vec<(DocumentId, PassOutcome)> {
        self.documents
            .iter_mut()
            .filter_map(|(id, doc)| doc.session.poll(now).map(|outcome| (*id, outcome)))
            .collect()
    }

    /// Earliest pending deadline across all documents.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.documents
            .values()
            .filter_map(|doc| doc.session.next_deadline())
            .min()
    }

    /// Apply new settings to every document.
    ///
    /// Documents whose language is now excluded are closed; their ids are returned.
    pub fn reload_settings(&mut self, settings: Arc<Settings>) -> Vec<DocumentId> {
        let excluded: Vec<DocumentId> = self
            .documents
            .iter()
            .filter(|(_, doc)| settings.is_language_excluded(&doc.language))
            .map(|(id, _)| *id)
            .collect();
        for id in &excluded {
            self.close(*id);
        }

        for doc in self.documents.values_mut() {
            doc.session.set_settings(Arc::clone(&settings));
        }
        tracing::info!(
            target: "brackets.manager",
            documents = self.documents.len(),
            closed = excluded.len(),
            "settings_reloaded"
        );
        self.settings = settings;
        excluded
    }
}
