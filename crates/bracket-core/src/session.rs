//! Per-document pipeline owner.
//!
//! A [`DocumentSession`] owns one document's text, tokenizer, line cache and scheduler, and
//! runs the recomputation pass:
//!
//! 1. truncate the line cache at the lowest dirty line
//! 2. tokenize the whole document
//! 3. map the token tree to bracket occurrences
//! 4. match every occurrence on a line that is no longer cached
//! 5. aggregate the cache into a [`ColorMap`] and hand it to every subscriber
//!
//! A tokenizer failure aborts the pass before anything is rendered: subscribers are not
//! called and [`DocumentSession::colors`] keeps the last successful result.

use crate::color_map::ColorMap;
use crate::error::TokenizeError;
use crate::line_cache::LineCache;
use crate::matcher::BracketMatcher;
use crate::position::{Position, map_occurrences};
use crate::scheduler::{Schedule, UpdateScheduler};
use crate::scope::{BracketPair, BracketPairs};
use crate::settings::Settings;
use crate::token::Tokenizer;
use std::sync::Arc;
use std::time::Instant;

/// Render subscriber, called with the full color map after every successful pass.
pub type RenderCallback = Box<dyn FnMut(&ColorMap) + Send>;

/// Result of one recomputation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass completed and subscribers were notified.
    Rendered {
        /// The new color map.
        colors: ColorMap,
        /// First line whose state was rebuilt.
        rebuilt_from: usize,
    },
    /// The tokenizer failed; nothing was rendered.
    Failed {
        /// The tokenizer's error.
        error: TokenizeError,
        /// Every configured color mapped to an empty list.
        colors: ColorMap,
    },
}

impl PassOutcome {
    /// The color map carried by this outcome.
    pub fn colors(&self) -> &ColorMap {
        match self {
            Self::Rendered { colors, .. } | Self::Failed { colors, .. } => colors,
        }
    }

    /// Returns `true` if subscribers were notified.
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }

    /// The tokenizer error, if the pass failed.
    pub fn error(&self) -> Option<&TokenizeError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            Self::Rendered { .. } => None,
        }
    }
}

/// One document under analysis.
pub struct DocumentSession<T: Tokenizer> {
    settings: Arc<Settings>,
    tokenizer: T,
    text: String,
    line_count: usize,
    cache: LineCache,
    scheduler: UpdateScheduler,
    colors: ColorMap,
    pairs: BracketPairs,
    subscribers: Vec<RenderCallback>,
}

impl<T: Tokenizer> std::fmt::Debug for DocumentSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSession")
            .field("line_count", &self.line_count)
            .field("cached_lines", &self.cache.len())
            .field("scheduler", &self.scheduler)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T: Tokenizer> DocumentSession<T> {
    /// Create a session. Nothing is computed until the first pass.
    pub fn new(settings: Arc<Settings>, tokenizer: T, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            line_count: line_count(&text),
            cache: LineCache::for_settings(&settings),
            scheduler: UpdateScheduler::new(settings.debounce()),
            colors: ColorMap::empty(&settings),
            pairs: BracketPairs::default(),
            subscribers: Vec::new(),
            settings,
            tokenizer,
            text,
        }
    }

    /// Register a render subscriber.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&ColorMap) + Send + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Replace the document text after an edit that started on `start_line`.
    ///
    /// Returns the pass outcome when the debounce delay is zero; otherwise the pass runs on a
    /// later [`DocumentSession::poll`] or [`DocumentSession::flush`].
    pub fn edit(
        &mut self,
        start_line: usize,
        text: impl Into<String>,
        now: Instant,
    ) -> Option<PassOutcome> {
        self.text = text.into();
        self.line_count = line_count(&self.text);
        match self.scheduler.note_edit(start_line, now) {
            Schedule::Immediate => self.flush(),
            Schedule::Deferred(_) => None,
        }
    }

    /// Run the pending pass if its deadline has been reached.
    pub fn poll(&mut self, now: Instant) -> Option<PassOutcome> {
        let dirty_line = self.scheduler.poll(now)?;
        Some(self.run_pass(dirty_line))
    }

    /// Run the pending pass now, if there is one.
    pub fn flush(&mut self) -> Option<PassOutcome> {
        let dirty_line = self.scheduler.take()?;
        Some(self.run_pass(dirty_line))
    }

    /// Recompute the whole document from line 0.
    pub fn refresh(&mut self) -> PassOutcome {
        self.scheduler.reset();
        self.run_pass(0)
    }

    /// Swap the configuration and recompute from scratch.
    pub fn set_settings(&mut self, settings: Arc<Settings>) -> PassOutcome {
        self.cache = LineCache::for_settings(&settings);
        self.scheduler.set_delay(settings.debounce());
        self.colors = ColorMap::empty(&settings);
        self.pairs = BracketPairs::default();
        self.settings = settings;
        self.refresh()
    }

    fn run_pass(&mut self, dirty_line: usize) -> PassOutcome {
        self.cache.invalidate_from(dirty_line);
        self.cache.invalidate_from(self.line_count);

        let root = match self.tokenizer.tokenize(&self.text) {
            Ok(root) => root,
            Err(error) => {
                tracing::warn!(
                    target: "brackets.session",
                    %error,
                    dirty_line,
                    "tokenize_failed"
                );
                return PassOutcome::Failed {
                    error,
                    colors: ColorMap::empty(&self.settings),
                };
            }
        };

        let mapped = map_occurrences(&root, self.settings.literals());
        let rebuilt_from = self.cache.len();
        let matcher = BracketMatcher::new(&self.settings);
        let mut past_end = 0usize;
        for occurrence in mapped.occurrences {
            let line = occurrence.line();
            if line < rebuilt_from {
                continue;
            }
            if line >= self.line_count {
                past_end += 1;
                continue;
            }
            matcher.process(self.cache.get_mut(line), occurrence);
        }
        if past_end > 0 {
            tracing::warn!(
                target: "brackets.session",
                past_end,
                line_count = self.line_count,
                "occurrences_past_document_end"
            );
        }
        self.cache.get(self.line_count - 1);

        let colors = ColorMap::aggregate(&self.settings, &self.cache);
        self.pairs = BracketPairs::from_cache(&self.settings, &self.cache);
        tracing::debug!(
            target: "brackets.session",
            dirty_line,
            rebuilt_from,
            lines = self.line_count,
            ranges = colors.range_count(),
            pairs = self.pairs.len(),
            "pass_rendered"
        );

        for subscriber in &mut self.subscribers {
            subscriber(&colors);
        }
        self.colors = colors.clone();
        PassOutcome::Rendered {
            colors,
            rebuilt_from,
        }
    }

    /// The last successfully rendered color map.
    pub fn colors(&self) -> &ColorMap {
        &self.colors
    }

    /// Matched pairs and orphans of the last successful pass.
    pub fn pairs(&self) -> &BracketPairs {
        &self.pairs
    }

    /// The innermost matched pair around `position`, as of the last successful pass.
    pub fn enclosing_pair(&self, position: Position) -> Option<&BracketPair> {
        self.pairs.enclosing(position)
    }

    /// Current document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines (line breaks + 1).
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// The line cache.
    pub fn cache(&self) -> &LineCache {
        &self.cache
    }

    /// The scheduler.
    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    /// When the pending pass becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// Active settings.
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }
}

fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}
