//! Matched pairs and enclosing-pair queries.
//!
//! [`BracketPairs`] is a snapshot of one completed pass: which open matched which close, and
//! which brackets ended up orphaned. Hosts use it for "active scope" highlighting and
//! jump-to-matching-bracket.

use crate::line_cache::LineCache;
use crate::matcher::BracketStatus;
use crate::pair::{BracketRole, Color, PairId};
use crate::position::{BracketRange, Position};
use crate::settings::Settings;
use std::collections::HashMap;

/// An open bracket and the close that matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketPair {
    /// Definition both brackets belong to.
    pub pair: PairId,
    /// Range of the open bracket.
    pub open: BracketRange,
    /// Range of the close bracket.
    pub close: BracketRange,
    /// Color the open bracket was painted with.
    pub color: Color,
}

impl BracketPair {
    /// From the start of the open bracket to the end of the close bracket.
    pub fn span(&self) -> BracketRange {
        BracketRange::new(self.open.start, self.close.end)
    }

    /// Returns `true` if `position` lies inside [`BracketPair::span`].
    pub fn contains(&self, position: Position) -> bool {
        self.span().contains(position)
    }
}

/// A bracket that never found its counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanBracket {
    /// Definition of the bracket.
    pub pair: PairId,
    /// Where it sits.
    pub range: BracketRange,
    /// Unclosed open or unmatched close.
    pub role: BracketRole,
    /// The definition's orphan color.
    pub color: Color,
}

/// Pairs and orphans of a completed pass, ordered by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketPairs {
    pairs: Vec<BracketPair>,
    orphans: Vec<OrphanBracket>,
}

impl BracketPairs {
    /// Collect pairs from a fully built cache.
    pub fn from_cache(settings: &Settings, cache: &LineCache) -> Self {
        let mut open_colors: HashMap<BracketRange, &Color> = HashMap::new();
        let mut pairs = Vec::new();
        let mut orphans = Vec::new();

        for line in cache.iter() {
            for colored in line.occurrences() {
                let occurrence = &colored.occurrence;
                match colored.status {
                    BracketStatus::Open => {
                        open_colors.insert(occurrence.range, &colored.color);
                    }
                    BracketStatus::Matched { open } => pairs.push(BracketPair {
                        pair: occurrence.pair,
                        open,
                        close: occurrence.range,
                        color: open_colors
                            .get(&open)
                            .map_or_else(|| colored.color.clone(), |c| (*c).clone()),
                    }),
                    BracketStatus::Orphan => orphans.push(OrphanBracket {
                        pair: occurrence.pair,
                        range: occurrence.range,
                        role: occurrence.role,
                        color: colored.color.clone(),
                    }),
                }
            }
        }

        if let Some(last) = cache.last() {
            orphans.extend(last.carried_out().entries().map(|entry| OrphanBracket {
                pair: entry.pair,
                range: entry.open,
                role: BracketRole::Open,
                color: settings.pair(entry.pair).orphan().clone(),
            }));
        }

        pairs.sort_by_key(|pair| pair.open);
        orphans.sort_by_key(|orphan| orphan.range);
        Self { pairs, orphans }
    }

    /// Matched pairs ordered by their open bracket.
    pub fn pairs(&self) -> &[BracketPair] {
        &self.pairs
    }

    /// Orphans ordered by position.
    pub fn orphans(&self) -> &[OrphanBracket] {
        &self.orphans
    }

    /// Number of matched pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The innermost pair whose span contains `position`.
    pub fn enclosing(&self, position: Position) -> Option<&BracketPair> {
        self.pairs
            .iter()
            .take_while(|pair| pair.open.start <= position)
            .filter(|pair| pair.contains(position))
            .max_by_key(|pair| pair.open.start)
    }

    /// The pair one of whose brackets is exactly `range`.
    pub fn matching(&self, range: &BracketRange) -> Option<&BracketPair> {
        self.pairs
            .iter()
            .find(|pair| pair.open == *range || pair.close == *range)
    }
}
