//! Per-line matching state with carry-over.
//!
//! The cache is a gap-free prefix of the document's lines. Line `i` starts with the stack
//! line `i - 1` ended with, so once a prefix is built it never has to be looked at again until
//! an edit truncates it.
//!
//! # Invalidation
//!
//! [`LineCache::invalidate_from`] truncates: an edit on line `L` can change every carried
//! stack from `L` onward, and inserted or deleted lines shift every later index anyway.

use crate::matcher::{ColoredOccurrence, MatchStack};
use crate::pair::Color;
use crate::position::BracketRange;
use crate::settings::{ColorMode, Settings};
use std::collections::BTreeMap;

/// Matching results for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineState {
    pub(crate) index: usize,
    pub(crate) carried_in: MatchStack,
    pub(crate) stack: MatchStack,
    pub(crate) occurrences: Vec<ColoredOccurrence>,
    pub(crate) color_ranges: BTreeMap<Color, Vec<BracketRange>>,
}

impl LineState {
    /// A line with no occurrences yet, starting from `carried_in`.
    pub fn new(index: usize, carried_in: MatchStack) -> Self {
        Self {
            index,
            stack: carried_in.clone(),
            carried_in,
            occurrences: Vec::new(),
            color_ranges: BTreeMap::new(),
        }
    }

    /// Line index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Stack at the start of the line.
    pub fn carried_in(&self) -> &MatchStack {
        &self.carried_in
    }

    /// Stack at the end of the line.
    pub fn carried_out(&self) -> &MatchStack {
        &self.stack
    }

    /// Occurrences on this line in document order.
    pub fn occurrences(&self) -> &[ColoredOccurrence] {
        &self.occurrences
    }

    /// Ranges per color on this line, in document order.
    pub fn color_ranges(&self) -> &BTreeMap<Color, Vec<BracketRange>> {
        &self.color_ranges
    }

    pub(crate) fn record(&mut self, occurrence: ColoredOccurrence) {
        self.color_ranges
            .entry(occurrence.color.clone())
            .or_default()
            .push(occurrence.occurrence.range);
        self.occurrences.push(occurrence);
    }
}

/// Lazily grown, truncate-on-invalidate store of [`LineState`]s.
#[derive(Debug, Clone)]
pub struct LineCache {
    initial: MatchStack,
    lines: Vec<LineState>,
}

impl LineCache {
    /// An empty cache whose line 0 starts from an empty stack for `mode`.
    pub fn new(mode: ColorMode, pair_count: usize) -> Self {
        Self {
            initial: MatchStack::empty(mode, pair_count),
            lines: Vec::new(),
        }
    }

    /// An empty cache shaped for `settings`.
    pub fn for_settings(settings: &Settings) -> Self {
        Self::new(settings.mode(), settings.pairs().len())
    }

    /// Line `index`, building every missing line up to it first.
    pub fn get(&mut self, index: usize) -> &LineState {
        self.fill_to(index);
        &self.lines[index]
    }

    /// Mutable access to line `index`, building every missing line up to it first.
    ///
    /// Lines above `index` must not be cached yet, otherwise their carried-in stacks go stale.
    pub fn get_mut(&mut self, index: usize) -> &mut LineState {
        self.fill_to(index);
        &mut self.lines[index]
    }

    /// Line `index` if it is already built.
    pub fn cached(&self, index: usize) -> Option<&LineState> {
        self.lines.get(index)
    }

    /// Discard every line at or above `index`.
    pub fn invalidate_from(&mut self, index: usize) {
        if index < self.lines.len() {
            tracing::trace!(
                target: "brackets.session",
                from = index,
                dropped = self.lines.len() - index,
                "line_cache_truncated"
            );
            self.lines.truncate(index);
        }
    }

    /// Number of built lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if no line is built.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The highest built line.
    pub fn last(&self) -> Option<&LineState> {
        self.lines.last()
    }

    /// Built lines in order.
    pub fn iter(&self) -> impl Iterator<Item = &LineState> {
        self.lines.iter()
    }

    /// Discard every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn fill_to(&mut self, index: usize) {
        while self.lines.len() <= index {
            let carried = match self.lines.last() {
                Some(previous) => previous.stack.clone(),
                None => self.initial.clone(),
            };
            self.lines.push(LineState::new(self.lines.len(), carried));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::StackEntry;
    use crate::pair::PairId;

    fn entry(line: usize) -> StackEntry {
        StackEntry {
            pair: PairId(0),
            color: Color::from("Gold"),
            open: BracketRange::on_line(line, 0, 1),
        }
    }

    #[test]
    fn test_get_fills_gaps_from_last_line() {
        let mut cache = LineCache::new(ColorMode::Consecutive, 1);
        if let MatchStack::Shared { entries, .. } = &mut cache.get_mut(1).stack {
            entries.push(entry(1));
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.cached(0).unwrap().carried_out().is_empty());

        let line4 = cache.get(4);
        assert_eq!(line4.index(), 4);
        assert_eq!(line4.carried_in().len(), 1);
        assert_eq!(cache.len(), 5);
        for i in 2..5 {
            let line = cache.cached(i).unwrap();
            assert_eq!(line.carried_in(), cache.cached(i - 1).unwrap().carried_out());
        }
    }

    #[test]
    fn test_invalidate_truncates() {
        let mut cache = LineCache::new(ColorMode::Independent, 2);
        cache.get(9);
        cache.invalidate_from(3);
        assert_eq!(cache.len(), 3);
        assert!(cache.cached(3).is_none());
        assert_eq!(cache.last().map(LineState::index), Some(2));

        // Past the end: nothing to do.
        cache.invalidate_from(10);
        assert_eq!(cache.len(), 3);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(
            cache.get(0).carried_in(),
            &MatchStack::PerPair(vec![Vec::new(), Vec::new()])
        );
    }
}
