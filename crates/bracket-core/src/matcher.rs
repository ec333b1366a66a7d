//! Stack-based bracket matching and color assignment.
//!
//! [`BracketMatcher::process`] consumes occurrences in document order against the
//! [`LineState`] of their line, pushing opens, popping matching closes, and recording the
//! color every occurrence gets this pass.
//!
//! | mode        | stack            | open color                            | close             |
//! |-------------|------------------|---------------------------------------|-------------------|
//! | Consecutive | one shared stack | `palette[(depth - 1 + offset) mod P]` | same pair on top  |
//! | Independent | one per pair     | `pair.palette[(depth - 1) mod P]`     | pops its own pair |
//!
//! `offset` is the pair's registration index when `forceUniqueOpeningColor` is set, else 0.
//!
//! With `forceIterationColorCycle`, consecutive opens ignore depth and walk the palette in
//! document order instead: the n-th open bracket (0-based) gets `palette[(n + offset) mod P]`,
//! so sibling pairs `()()` get two different colors. Closes always take their open's color.

use crate::line_cache::LineState;
use crate::pair::{BracketRole, Color, PairDefinition, PairId};
use crate::position::{BracketRange, Occurrence};
use crate::settings::{ColorMode, Settings};

/// One open bracket waiting for its close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    /// Definition of the open bracket.
    pub pair: PairId,
    /// Color assigned when it was pushed.
    pub color: Color,
    /// Where the open bracket sits.
    pub open: BracketRange,
}

/// Nesting state carried from line to line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStack {
    /// Consecutive mode: one stack for every pair definition.
    Shared {
        /// Open entries, bottom to top.
        entries: Vec<StackEntry>,
        /// Number of open brackets pushed so far in the document.
        opened: usize,
    },
    /// Independent mode: one stack per pair definition, indexed by [`PairId`].
    PerPair(Vec<Vec<StackEntry>>),
}

impl MatchStack {
    /// An empty stack for `mode` with `pair_count` definitions.
    pub fn empty(mode: ColorMode, pair_count: usize) -> Self {
        match mode {
            ColorMode::Consecutive => Self::Shared {
                entries: Vec::new(),
                opened: 0,
            },
            ColorMode::Independent => Self::PerPair(vec![Vec::new(); pair_count]),
        }
    }

    /// Returns `true` when no bracket is open.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Shared { entries, .. } => entries.is_empty(),
            Self::PerPair(stacks) => stacks.iter().all(Vec::is_empty),
        }
    }

    /// Total number of open brackets across all stacks.
    pub fn len(&self) -> usize {
        match self {
            Self::Shared { entries, .. } => entries.len(),
            Self::PerPair(stacks) => stacks.iter().map(Vec::len).sum(),
        }
    }

    /// Every open entry, bottom to top (stack by stack in independent mode).
    pub fn entries(&self) -> Box<dyn Iterator<Item = &StackEntry> + '_> {
        match self {
            Self::Shared { entries, .. } => Box::new(entries.iter()),
            Self::PerPair(stacks) => Box::new(stacks.iter().flatten()),
        }
    }
}

/// Line-time classification of an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketStatus {
    /// An open bracket that was pushed.
    Open,
    /// A close bracket that popped the open at `open`.
    Matched {
        /// Range of the matching open bracket.
        open: BracketRange,
    },
    /// A close bracket with nothing to match.
    Orphan,
}

/// An occurrence with the color it was given this pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoredOccurrence {
    /// The located bracket.
    pub occurrence: Occurrence,
    /// Assigned color.
    pub color: Color,
    /// How it was classified on its line.
    pub status: BracketStatus,
}

/// Applies a [`Settings`] coloring policy to occurrences.
#[derive(Debug, Clone, Copy)]
pub struct BracketMatcher<'a> {
    settings: &'a Settings,
}

impl<'a> BracketMatcher<'a> {
    /// Create a matcher for `settings`.
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Match `occurrence` against `state` and record its color there.
    ///
    /// `state` must be the line the occurrence starts on, and occurrences must arrive in
    /// document order.
    pub fn process(&self, state: &mut LineState, occurrence: Occurrence) {
        let def = self.settings.pair(occurrence.pair);

        let (color, status) = match &mut state.stack {
            MatchStack::Shared { entries, opened } => {
                self.consecutive(entries, opened, def, &occurrence)
            }
            MatchStack::PerPair(stacks) => {
                Self::independent(&mut stacks[def.id().index()], def, &occurrence)
            }
        };

        state.record(ColoredOccurrence {
            occurrence,
            color,
            status,
        });
    }

    fn consecutive(
        &self,
        stack: &mut Vec<StackEntry>,
        opened: &mut usize,
        def: &PairDefinition,
        occurrence: &Occurrence,
    ) -> (Color, BracketStatus) {
        match occurrence.role {
            BracketRole::Open => {
                let cycle_index = if self.settings.force_iteration_color_cycle() {
                    *opened
                } else {
                    stack.len()
                };
                let color = self.consecutive_color(def, cycle_index);
                *opened += 1;
                stack.push(StackEntry {
                    pair: def.id(),
                    color: color.clone(),
                    open: occurrence.range,
                });
                (color, BracketStatus::Open)
            }
            // A close that does not match the innermost open leaves the stack alone.
            BracketRole::Close => match stack.pop_if(|top| top.pair == def.id()) {
                Some(entry) => (entry.color, BracketStatus::Matched { open: entry.open }),
                None => (def.orphan().clone(), BracketStatus::Orphan),
            },
        }
    }

    fn independent(
        stack: &mut Vec<StackEntry>,
        def: &PairDefinition,
        occurrence: &Occurrence,
    ) -> (Color, BracketStatus) {
        match occurrence.role {
            BracketRole::Open => {
                let color = def.color_at(stack.len()).clone();
                stack.push(StackEntry {
                    pair: def.id(),
                    color: color.clone(),
                    open: occurrence.range,
                });
                (color, BracketStatus::Open)
            }
            BracketRole::Close => match stack.pop() {
                Some(entry) => (entry.color, BracketStatus::Matched { open: entry.open }),
                None => (def.orphan().clone(), BracketStatus::Orphan),
            },
        }
    }

    /// Shared-palette color for a zero-based cycle index (depth - 1, or the open count).
    fn consecutive_color(&self, def: &PairDefinition, cycle_index: usize) -> Color {
        let offset = if self.settings.force_unique_opening_color() {
            def.id().index()
        } else {
            0
        };
        def.color_at(cycle_index + offset).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PairSpec;
    use pretty_assertions::assert_eq;

    fn occurrences(settings: &Settings, line: usize, text: &str) -> Vec<Occurrence> {
        settings
            .literals()
            .pattern()
            .find_iter(text)
            .filter_map(|m| {
                let (pair, role) = settings.literals().resolve(m.as_str())?;
                Some(Occurrence {
                    range: BracketRange::on_line(line, m.start(), m.end()),
                    literal: m.as_str().to_string(),
                    pair,
                    role,
                })
            })
            .collect()
    }

    fn run(settings: &Settings, text: &str) -> LineState {
        let mut state = LineState::new(
            0,
            MatchStack::empty(settings.mode(), settings.pairs().len()),
        );
        let matcher = BracketMatcher::new(settings);
        for occurrence in occurrences(settings, 0, text) {
            matcher.process(&mut state, occurrence);
        }
        state
    }

    fn colors(state: &LineState) -> Vec<&str> {
        state
            .occurrences()
            .iter()
            .map(|o| o.color.as_str())
            .collect()
    }

    fn two_pairs() -> Settings {
        Settings::consecutive([("(", ")"), ("[", "]")], ["A", "B", "C"], "X").unwrap()
    }

    #[test]
    fn test_consecutive_colors_follow_depth() {
        let settings = Settings::consecutive([("(", ")")], ["A", "B"], "X").unwrap();
        let state = run(&settings, "((()))");
        assert_eq!(colors(&state), vec!["A", "B", "A", "A", "B", "A"]);
        assert!(state.carried_out().is_empty());
    }

    #[test]
    fn test_consecutive_mismatched_close_is_orphan_and_keeps_stack() {
        let state = run(&two_pairs(), "(]");
        assert_eq!(colors(&state), vec!["A", "X"]);
        assert_eq!(state.occurrences()[1].status, BracketStatus::Orphan);
        assert_eq!(state.carried_out().len(), 1);

        let state = run(&two_pairs(), "(])");
        assert_eq!(
            state.occurrences()[2].status,
            BracketStatus::Matched {
                open: BracketRange::on_line(0, 0, 1)
            }
        );
        assert!(state.carried_out().is_empty());
    }

    #[test]
    fn test_close_on_empty_stack_is_orphan() {
        let state = run(&two_pairs(), ")]");
        assert_eq!(colors(&state), vec!["X", "X"]);
        assert!(state.carried_out().is_empty());
    }

    #[test]
    fn test_force_unique_opening_color_offsets_by_pair() {
        let plain = run(&two_pairs(), "[ ([ ");
        assert_eq!(colors(&plain), vec!["A", "B", "C"]);

        let unique = two_pairs().with_force_unique_opening_color(true);
        let state = run(&unique, "[ ([ ");
        // `[` is pair 1: depth 1 -> B; `(` depth 2 -> B; `[` depth 3 -> palette[3] -> A.
        assert_eq!(colors(&state), vec!["B", "B", "A"]);

        let state = run(&unique, "()[]");
        assert_eq!(colors(&state), vec!["A", "A", "B", "B"]);
    }

    #[test]
    fn test_force_iteration_color_cycle_walks_palette_in_open_order() {
        let by_depth = run(&two_pairs(), "()()[]");
        assert_eq!(colors(&by_depth), vec!["A", "A", "A", "A", "A", "A"]);

        let cycling = two_pairs().with_force_iteration_color_cycle(true);
        let state = run(&cycling, "()()[]");
        assert_eq!(colors(&state), vec!["A", "A", "B", "B", "C", "C"]);

        // Nesting still pairs each close with its open's color.
        let state = run(&cycling, "(()[])(");
        assert_eq!(colors(&state), vec!["A", "B", "B", "C", "C", "A", "A"]);
        assert_eq!(
            state.carried_out(),
            &MatchStack::Shared {
                entries: vec![StackEntry {
                    pair: PairId(0),
                    color: Color::from("A"),
                    open: BracketRange::on_line(0, 6, 7),
                }],
                opened: 4,
            }
        );
    }

    #[test]
    fn test_force_iteration_color_cycle_with_unique_offset() {
        let settings = two_pairs()
            .with_force_unique_opening_color(true)
            .with_force_iteration_color_cycle(true);
        // `(` n=0 -> A; `[` n=1 + offset 1 -> C; `(` n=2 -> C.
        let state = run(&settings, "([])()");
        assert_eq!(colors(&state), vec!["A", "C", "C", "A", "C", "C"]);
    }

    #[test]
    fn test_open_count_carries_across_lines() {
        let settings = two_pairs().with_force_iteration_color_cycle(true);
        let matcher = BracketMatcher::new(&settings);

        let mut first = LineState::new(0, MatchStack::empty(settings.mode(), 2));
        for occurrence in occurrences(&settings, 0, "()") {
            matcher.process(&mut first, occurrence);
        }
        let mut second = LineState::new(1, first.carried_out().clone());
        for occurrence in occurrences(&settings, 1, "()") {
            matcher.process(&mut second, occurrence);
        }
        assert_eq!(colors(&second), vec!["B", "B"]);
    }

    #[test]
    fn test_independent_stacks_are_isolated() {
        let settings = Settings::independent([
            PairSpec::new("(", ")", ["P0", "P1"], "X0"),
            PairSpec::new("[", "]", ["Q0", "Q1"], "X1"),
        ])
        .unwrap();

        let state = run(&settings, "([)]");
        assert_eq!(colors(&state), vec!["P0", "Q0", "P0", "Q0"]);
        assert!(matches!(
            state.occurrences()[2].status,
            BracketStatus::Matched { .. }
        ));

        let state = run(&settings, "[(()]))");
        assert_eq!(
            colors(&state),
            vec!["Q0", "P0", "P1", "P1", "Q0", "P0", "X0"]
        );
    }

    #[test]
    fn test_state_carries_across_lines() {
        let settings = two_pairs();
        let matcher = BracketMatcher::new(&settings);

        let mut first = LineState::new(0, MatchStack::empty(settings.mode(), 2));
        for occurrence in occurrences(&settings, 0, "([") {
            matcher.process(&mut first, occurrence);
        }

        let mut second = LineState::new(1, first.carried_out().clone());
        for occurrence in occurrences(&settings, 1, "])") {
            matcher.process(&mut second, occurrence);
        }

        assert_eq!(colors(&second), vec!["B", "A"]);
        assert_eq!(
            second.occurrences()[1].status,
            BracketStatus::Matched {
                open: BracketRange::on_line(0, 0, 1)
            }
        );
        assert_eq!(second.carried_in(), first.carried_out());
        assert!(second.carried_out().is_empty());
    }
}
