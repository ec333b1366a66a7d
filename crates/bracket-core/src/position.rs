//! Positions, ranges and the position mapper.
//!
//! The mapper walks a token tree in document order, keeping a running cursor, and turns every
//! bracket literal found inside a punctuation leaf into an [`Occurrence`].

use crate::pair::{BracketRole, LiteralTable, PairId};
use crate::token::Token;

/// A zero-based (line, column) position. Columns count Unicode scalar values (`char`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line index.
    pub line: usize,
    /// Column (in `char`s) within the line.
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position reached after `text` when starting at `self`.
    ///
    /// Each `\n` moves to the next line and resets the column; the column afterwards is the
    /// length of whatever follows the last line break.
    pub fn advance(self, text: &str) -> Self {
        match text.rfind('\n') {
            Some(last_break) => Self {
                line: self.line + text.matches('\n').count(),
                column: text[last_break + 1..].chars().count(),
            },
            None => Self {
                line: self.line,
                column: self.column + text.chars().count(),
            },
        }
    }
}

/// A half-open `start..end` range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BracketRange {
    /// Range start (inclusive).
    pub start: Position,
    /// Range end (exclusive).
    pub end: Position,
}

impl BracketRange {
    /// Create a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Single-line range shorthand.
    pub fn on_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            start: Position::new(line, start_column),
            end: Position::new(line, end_column),
        }
    }

    /// Returns `true` if `position` lies in `start..end`.
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }
}

/// A located bracket instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Occurrence {
    /// Where the literal sits in the document.
    pub range: BracketRange,
    /// The matched literal text.
    pub literal: String,
    /// The definition the literal resolved to.
    pub pair: PairId,
    /// Open or close.
    pub role: BracketRole,
}

impl Occurrence {
    /// Line the occurrence starts on.
    pub fn line(&self) -> usize {
        self.range.start.line
    }
}

/// Output of [`map_occurrences`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedTokens {
    /// Occurrences in document order.
    pub occurrences: Vec<Occurrence>,
    /// Cursor after the whole tree was traversed.
    pub end: Position,
}

/// Walk `root` depth-first, left to right, and collect bracket occurrences.
///
/// Only the leaf text directly wrapped by a punctuation node is searched; every other leaf
/// just advances the cursor. Uses an explicit work stack, so pathological nesting depth cannot
/// overflow the call stack.
pub fn map_occurrences(root: &Token, literals: &LiteralTable) -> MappedTokens {
    let mut occurrences = Vec::new();
    let mut cursor = Position::default();
    let mut work: Vec<&Token> = vec![root];

    while let Some(token) = work.pop() {
        match token {
            Token::Text(text) => cursor = cursor.advance(text),
            Token::List(children) => work.extend(children.iter().rev()),
            Token::Node { category, inner } => match inner.as_ref() {
                Token::Text(text) if category.is_punctuation() => {
                    cursor = scan_punctuation(text, cursor, literals, &mut occurrences);
                }
                other => work.push(other),
            },
        }
    }

    MappedTokens {
        occurrences,
        end: cursor,
    }
}

fn scan_punctuation(
    text: &str,
    start: Position,
    literals: &LiteralTable,
    out: &mut Vec<Occurrence>,
) -> Position {
    let mut cursor = start;
    let mut consumed = 0usize;

    for m in literals.pattern().find_iter(text) {
        let Some((pair, role)) = literals.resolve(m.as_str()) else {
            continue;
        };
        let begin = cursor.advance(&text[consumed..m.start()]);
        let end = begin.advance(m.as_str());
        out.push(Occurrence {
            range: BracketRange::new(begin, end),
            literal: m.as_str().to_string(),
            pair,
            role,
        });
        cursor = end;
        consumed = m.end();
    }

    cursor.advance(&text[consumed..])
}
