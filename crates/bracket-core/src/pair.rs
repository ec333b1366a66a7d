//! Pair definitions, colors and the combined bracket literal pattern.

use crate::error::SettingsError;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An opaque color identifier (`"Gold"`, `"#ffd700"`, a theme key, ...).
///
/// The engine never interprets colors; it only hands them back to the renderer. Cloning is
/// cheap (shared string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color(Arc<str>);

impl Color {
    /// Create a color identifier.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The color identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Color {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

/// Registration index of a [`PairDefinition`] within its [`Settings`](crate::Settings).
///
/// Lower ids win literal collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairId(pub usize);

impl PairId {
    /// The registration index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether a bracket literal opens or closes its pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketRole {
    /// Opening literal (e.g. `(`).
    Open,
    /// Closing literal (e.g. `)`).
    Close,
}

/// An open/close literal pair with its palette and orphan color.
///
/// Immutable once constructed. In consecutive mode every definition of a [`Settings`] shares
/// the same palette and orphan color.
///
/// [`Settings`]: crate::Settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairDefinition {
    id: PairId,
    open: String,
    close: String,
    palette: Arc<[Color]>,
    orphan: Color,
}

impl PairDefinition {
    /// Validate and create a definition.
    ///
    /// `field` is the settings path used in error messages.
    pub(crate) fn new(
        id: PairId,
        field: &str,
        open: String,
        close: String,
        palette: Arc<[Color]>,
        orphan: Color,
    ) -> Result<Self, SettingsError> {
        if open.is_empty() {
            return Err(SettingsError::EmptyLiteral {
                field: format!("{field}.open"),
            });
        }
        if close.is_empty() {
            return Err(SettingsError::EmptyLiteral {
                field: format!("{field}.close"),
            });
        }
        if open == close {
            return Err(SettingsError::IdenticalLiterals {
                field: field.to_string(),
                literal: open,
            });
        }
        if palette.is_empty() {
            return Err(SettingsError::EmptyPalette {
                field: format!("{field}.palette"),
            });
        }
        if let Some(idx) = palette.iter().position(|c| c.as_str().is_empty()) {
            return Err(SettingsError::InvalidColor {
                field: format!("{field}.palette[{idx}]"),
            });
        }
        if orphan.as_str().is_empty() {
            return Err(SettingsError::InvalidColor {
                field: format!("{field}.orphan"),
            });
        }

        Ok(Self {
            id,
            open,
            close,
            palette,
            orphan,
        })
    }

    /// Registration index.
    pub fn id(&self) -> PairId {
        self.id
    }

    /// Opening literal.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// Closing literal.
    pub fn close(&self) -> &str {
        &self.close
    }

    /// Ordered palette (never empty).
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Color given to this definition's orphans.
    pub fn orphan(&self) -> &Color {
        &self.orphan
    }

    /// Palette color for a zero-based cycle index.
    pub fn color_at(&self, index: usize) -> &Color {
        &self.palette[index % self.palette.len()]
    }

    /// The literal for `role`.
    pub fn literal(&self, role: BracketRole) -> &str {
        match role {
            BracketRole::Open => &self.open,
            BracketRole::Close => &self.close,
        }
    }
}

/// Literal lookup for a set of pair definitions.
///
/// Holds one regular expression matching any configured literal (escaped, longest first so a
/// two-character bracket wins over its first character) and a literal → (pair, role) map in
/// which the first registered definition wins.
#[derive(Debug, Clone)]
pub struct LiteralTable {
    pattern: Regex,
    roles: HashMap<String, (PairId, BracketRole)>,
}

impl LiteralTable {
    /// Build the table for `pairs` (in registration order).
    pub fn new(pairs: &[PairDefinition]) -> Result<Self, SettingsError> {
        let mut roles = HashMap::new();
        for pair in pairs {
            for role in [BracketRole::Open, BracketRole::Close] {
                roles
                    .entry(pair.literal(role).to_string())
                    .or_insert((pair.id(), role));
            }
        }

        let mut literals: Vec<&str> = roles.keys().map(String::as_str).collect();
        literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = literals
            .iter()
            .map(|literal| regex::escape(literal))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation)?;

        Ok(Self { pattern, roles })
    }

    /// The combined literal pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Resolve a literal to the first definition that uses it.
    pub fn resolve(&self, literal: &str) -> Option<(PairId, BracketRole)> {
        self.roles.get(literal).copied()
    }

    /// Number of distinct literals.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Returns `true` when no literal is configured.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(names: &[&str]) -> Arc<[Color]> {
        names.iter().map(|n| Color::from(*n)).collect()
    }

    fn def(id: usize, open: &str, close: &str) -> PairDefinition {
        PairDefinition::new(
            PairId(id),
            "pair",
            open.to_string(),
            close.to_string(),
            palette(&["Gold"]),
            Color::from("Red"),
        )
        .unwrap()
    }

    #[test]
    fn test_definition_validation() {
        let empty = PairDefinition::new(
            PairId(0),
            "pairs[0]",
            String::new(),
            ")".to_string(),
            palette(&["Gold"]),
            Color::from("Red"),
        );
        assert!(matches!(
            empty,
            Err(SettingsError::EmptyLiteral { field }) if field == "pairs[0].open"
        ));

        let same = PairDefinition::new(
            PairId(0),
            "pairs[0]",
            "|".to_string(),
            "|".to_string(),
            palette(&["Gold"]),
            Color::from("Red"),
        );
        assert!(matches!(same, Err(SettingsError::IdenticalLiterals { .. })));

        let no_colors = PairDefinition::new(
            PairId(0),
            "pairs[0]",
            "(".to_string(),
            ")".to_string(),
            palette(&[]),
            Color::from("Red"),
        );
        assert!(matches!(no_colors, Err(SettingsError::EmptyPalette { .. })));
    }

    #[test]
    fn test_longest_literal_wins() {
        let table = LiteralTable::new(&[def(0, "(", ")"), def(1, "(*", "*)")]).unwrap();
        let found: Vec<&str> = table
            .pattern()
            .find_iter("(*x*) (y)")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["(*", "*)", "(", ")"]);
    }

    #[test]
    fn test_first_registered_wins_collisions() {
        let table = LiteralTable::new(&[def(0, "<", ">"), def(1, "<", "/>")]).unwrap();
        assert_eq!(table.resolve("<"), Some((PairId(0), BracketRole::Open)));
        assert_eq!(table.resolve("/>"), Some((PairId(1), BracketRole::Close)));
        assert_eq!(table.resolve("x"), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_regex_metacharacters_are_escaped() {
        let table = LiteralTable::new(&[def(0, "[", "]"), def(1, "{", "}")]).unwrap();
        assert_eq!(table.pattern().find_iter("a[b]{c}").count(), 4);
    }
}
