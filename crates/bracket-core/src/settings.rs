//! Validated colorizer configuration.
//!
//! [`Settings`] can be built programmatically ([`Settings::consecutive`],
//! [`Settings::independent`]) or parsed from the JSON settings shape used by editor hosts:
//!
//! ```json
//! {
//!   "colorMode": "Consecutive",
//!   "consecutivePairColors": ["()", "[]", "{}", ["Gold", "Orchid", "LightSkyBlue"], "Red"],
//!   "independentPairColors": [["()", ["Gold", "Orchid"], "Red"]],
//!   "forceUniqueOpeningColor": false,
//!   "forceIterationColorCycle": false,
//!   "timeOut": 200,
//!   "excludedLanguages": ["plaintext"]
//! }
//! ```
//!
//! A bracket pair is either a two-character string (`"()"`) or an `[open, close]` array for
//! multi-character literals (`["<%", "%>"]`). Validation stops at the first violated field and
//! reports it by name; no `Settings` value exists for invalid input.

use crate::error::SettingsError;
use crate::pair::{Color, LiteralTable, PairDefinition, PairId};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Default debounce delay (`timeOut`) in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

const CONSECUTIVE_FIELD: &str = "consecutivePairColors";
const INDEPENDENT_FIELD: &str = "independentPairColors";

/// How colors are assigned to nesting levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ColorMode {
    /// One shared stack and palette across all pair definitions.
    #[default]
    Consecutive,
    /// One stack and palette per pair definition.
    Independent,
}

/// Input for one independent-mode pair definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSpec {
    /// Opening literal.
    pub open: String,
    /// Closing literal.
    pub close: String,
    /// Palette cycled by nesting depth.
    pub palette: Vec<Color>,
    /// Color for orphans of this pair.
    pub orphan: Color,
}

impl PairSpec {
    /// Create a pair spec.
    pub fn new<K: Into<Color>>(
        open: impl Into<String>,
        close: impl Into<String>,
        palette: impl IntoIterator<Item = K>,
        orphan: impl Into<Color>,
    ) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            palette: palette.into_iter().map(Into::into).collect(),
            orphan: orphan.into(),
        }
    }
}

/// Validated configuration consumed by the engine.
#[derive(Debug, Clone)]
pub struct Settings {
    mode: ColorMode,
    pairs: Vec<PairDefinition>,
    literals: LiteralTable,
    force_unique_opening_color: bool,
    force_iteration_color_cycle: bool,
    debounce: Duration,
    excluded_languages: Vec<String>,
}

impl Settings {
    /// Consecutive-mode settings: every pair shares `palette` and `orphan`.
    pub fn consecutive<O, C, K>(
        pairs: impl IntoIterator<Item = (O, C)>,
        palette: impl IntoIterator<Item = K>,
        orphan: impl Into<Color>,
    ) -> Result<Self, SettingsError>
    where
        O: Into<String>,
        C: Into<String>,
        K: Into<Color>,
    {
        let palette: Vec<Color> = palette.into_iter().map(Into::into).collect();
        let orphan = orphan.into();
        validate_palette(&palette, "palette")?;
        validate_color(&orphan, "orphan")?;

        let pairs = pairs
            .into_iter()
            .map(|(open, close)| (open.into(), close.into()))
            .collect();
        Self::build_consecutive(pairs, palette.into(), orphan, "pairs")
    }

    /// Independent-mode settings: every pair has its own palette and orphan color.
    pub fn independent(pairs: impl IntoIterator<Item = PairSpec>) -> Result<Self, SettingsError> {
        let definitions = pairs
            .into_iter()
            .enumerate()
            .map(|(idx, spec)| {
                let field = format!("pairs[{idx}]");
                validate_palette(&spec.palette, &format!("{field}.palette"))?;
                PairDefinition::new(
                    PairId(idx),
                    &field,
                    spec.open,
                    spec.close,
                    spec.palette.into(),
                    spec.orphan,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_definitions(ColorMode::Independent, definitions, "pairs")
    }

    /// Parse and validate the JSON settings document.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Validate an already-parsed JSON settings document.
    ///
    /// Both pair lists are validated, whichever mode is active.
    pub fn from_json_value(value: Value) -> Result<Self, SettingsError> {
        let document: SettingsDocument = serde_json::from_value(value)?;

        let (pairs, palette, orphan) = parse_consecutive(&document.consecutive_pair_colors)?;
        let independent = parse_independent(&document.independent_pair_colors)?;

        let settings = match document.color_mode {
            ColorMode::Consecutive => {
                Self::build_consecutive(pairs, palette.into(), orphan, CONSECUTIVE_FIELD)?
            }
            ColorMode::Independent => {
                let definitions = independent
                    .into_iter()
                    .enumerate()
                    .map(|(idx, spec)| {
                        PairDefinition::new(
                            PairId(idx),
                            &format!("{INDEPENDENT_FIELD}[{idx}]"),
                            spec.open,
                            spec.close,
                            spec.palette.into(),
                            spec.orphan,
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Self::from_definitions(ColorMode::Independent, definitions, INDEPENDENT_FIELD)?
            }
        };

        let settings = settings
            .with_force_unique_opening_color(document.force_unique_opening_color)
            .with_force_iteration_color_cycle(document.force_iteration_color_cycle)
            .with_debounce(Duration::from_millis(document.time_out))
            .with_excluded_languages(document.excluded_languages);

        tracing::debug!(
            target: "brackets.settings",
            mode = ?settings.mode,
            pairs = settings.pairs.len(),
            debounce_ms = document.time_out,
            "settings_loaded"
        );
        Ok(settings)
    }

    fn build_consecutive(
        pairs: Vec<(String, String)>,
        palette: Arc<[Color]>,
        orphan: Color,
        field: &str,
    ) -> Result<Self, SettingsError> {
        let definitions = pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (open, close))| {
                PairDefinition::new(
                    PairId(idx),
                    &format!("{field}[{idx}]"),
                    open,
                    close,
                    palette.clone(),
                    orphan.clone(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_definitions(ColorMode::Consecutive, definitions, field)
    }

    fn from_definitions(
        mode: ColorMode,
        pairs: Vec<PairDefinition>,
        field: &str,
    ) -> Result<Self, SettingsError> {
        if pairs.is_empty() {
            return Err(SettingsError::NoPairDefinitions {
                field: field.to_string(),
            });
        }
        let literals = LiteralTable::new(&pairs)?;
        Ok(Self {
            mode,
            pairs,
            literals,
            force_unique_opening_color: false,
            force_iteration_color_cycle: false,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            excluded_languages: Vec::new(),
        })
    }

    /// Offset consecutive-mode colors by pair identity so different bracket types opened at
    /// the same depth get different colors.
    pub fn with_force_unique_opening_color(mut self, enabled: bool) -> Self {
        self.force_unique_opening_color = enabled;
        self
    }

    /// Color consecutive-mode opens by their order in the document instead of their depth:
    /// each open takes the palette entry after the previous open's, so sibling pairs cycle
    /// through the palette. Closes keep their opener's color.
    pub fn with_force_iteration_color_cycle(mut self, enabled: bool) -> Self {
        self.force_iteration_color_cycle = enabled;
        self
    }

    /// Set the debounce delay. Zero recomputes synchronously on every edit.
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    /// Set the language ids that are never colorized.
    pub fn with_excluded_languages<S: Into<String>>(
        mut self,
        languages: impl IntoIterator<Item = S>,
    ) -> Self {
        self.excluded_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Active color mode.
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Pair definitions in registration order.
    pub fn pairs(&self) -> &[PairDefinition] {
        &self.pairs
    }

    /// Look up a definition by id.
    ///
    /// Ids handed out by this `Settings` value are always valid.
    pub fn pair(&self, id: PairId) -> &PairDefinition {
        &self.pairs[id.index()]
    }

    /// Combined literal lookup.
    pub fn literals(&self) -> &LiteralTable {
        &self.literals
    }

    /// See [`Settings::with_force_unique_opening_color`].
    pub fn force_unique_opening_color(&self) -> bool {
        self.force_unique_opening_color
    }

    /// See [`Settings::with_force_iteration_color_cycle`].
    pub fn force_iteration_color_cycle(&self) -> bool {
        self.force_iteration_color_cycle
    }

    /// Debounce delay.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Excluded language ids.
    pub fn excluded_languages(&self) -> &[String] {
        &self.excluded_languages
    }

    /// Returns `true` if `language` must not be colorized.
    pub fn is_language_excluded(&self, language: &str) -> bool {
        self.excluded_languages.iter().any(|l| l == language)
    }

    /// Every color the configuration can emit (palettes and orphan colors), sorted, deduped.
    pub fn colors(&self) -> Vec<Color> {
        let mut colors = BTreeSet::new();
        for pair in &self.pairs {
            colors.extend(pair.palette().iter().cloned());
            colors.insert(pair.orphan().clone());
        }
        colors.into_iter().collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsDocument {
    #[serde(default)]
    color_mode: ColorMode,
    #[serde(default = "default_consecutive_pair_colors")]
    consecutive_pair_colors: Value,
    #[serde(default = "default_independent_pair_colors")]
    independent_pair_colors: Value,
    #[serde(default)]
    force_unique_opening_color: bool,
    #[serde(default)]
    force_iteration_color_cycle: bool,
    #[serde(default = "default_time_out")]
    time_out: u64,
    #[serde(default)]
    excluded_languages: Vec<String>,
}

fn default_consecutive_pair_colors() -> Value {
    json!(["()", "[]", "{}", ["Gold", "Orchid", "LightSkyBlue"], "Red"])
}

fn default_independent_pair_colors() -> Value {
    json!([
        ["()", ["Gold", "Orchid", "LightSkyBlue"], "Red"],
        ["[]", ["Gold", "Orchid", "LightSkyBlue"], "Red"],
        ["{}", ["Gold", "Orchid", "LightSkyBlue"], "Red"]
    ])
}

const fn default_time_out() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn validate_color(color: &Color, field: &str) -> Result<(), SettingsError> {
    if color.as_str().is_empty() {
        return Err(SettingsError::InvalidColor {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn validate_palette(palette: &[Color], field: &str) -> Result<(), SettingsError> {
    if palette.is_empty() {
        return Err(SettingsError::EmptyPalette {
            field: field.to_string(),
        });
    }
    for (idx, color) in palette.iter().enumerate() {
        validate_color(color, &format!("{field}[{idx}]"))?;
    }
    Ok(())
}

type ConsecutiveParts = (Vec<(String, String)>, Vec<Color>, Color);

/// `[pair, pair, ..., [palette], orphan]`
fn parse_consecutive(value: &Value) -> Result<ConsecutiveParts, SettingsError> {
    let items = value
        .as_array()
        .ok_or_else(|| SettingsError::NotAnArray {
            field: CONSECUTIVE_FIELD.to_string(),
        })?;
    if items.len() < 3 {
        return Err(SettingsError::TooFewElements {
            field: CONSECUTIVE_FIELD.to_string(),
            expected: 3,
            actual: items.len(),
        });
    }

    let orphan_idx = items.len() - 1;
    let palette_idx = orphan_idx - 1;
    let orphan = parse_color(
        &items[orphan_idx],
        format!("{CONSECUTIVE_FIELD}[{orphan_idx}]"),
    )?;
    let palette = parse_palette(
        &items[palette_idx],
        &format!("{CONSECUTIVE_FIELD}[{palette_idx}]"),
    )?;
    let pairs = items[..palette_idx]
        .iter()
        .enumerate()
        .map(|(idx, item)| parse_pair(item, &format!("{CONSECUTIVE_FIELD}[{idx}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((pairs, palette, orphan))
}

/// `[[pair, [palette], orphan], ...]`
fn parse_independent(value: &Value) -> Result<Vec<PairSpec>, SettingsError> {
    let items = value
        .as_array()
        .ok_or_else(|| SettingsError::NotAnArray {
            field: INDEPENDENT_FIELD.to_string(),
        })?;

    let mut specs = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let field = format!("{INDEPENDENT_FIELD}[{idx}]");
        let parts = item.as_array().ok_or_else(|| SettingsError::NotAnArray {
            field: field.clone(),
        })?;
        if parts.len() != 3 {
            return Err(SettingsError::WrongElementCount {
                field,
                expected: 3,
                actual: parts.len(),
            });
        }
        let (open, close) = parse_pair(&parts[0], &format!("{field}[0]"))?;
        let palette = parse_palette(&parts[1], &format!("{field}[1]"))?;
        let orphan = parse_color(&parts[2], format!("{field}[2]"))?;
        specs.push(PairSpec {
            open,
            close,
            palette,
            orphan,
        });
    }
    Ok(specs)
}

fn parse_pair(value: &Value, field: &str) -> Result<(String, String), SettingsError> {
    match value {
        Value::String(pair) => {
            let mut chars = pair.chars();
            match (chars.next(), chars.next(), chars.next()) {
                (Some(open), Some(close), None) => Ok((open.to_string(), close.to_string())),
                _ => Err(SettingsError::InvalidBracketPair {
                    field: field.to_string(),
                    reason: "a string pair must be exactly two characters",
                }),
            }
        }
        Value::Array(parts) => match parts.as_slice() {
            [Value::String(open), Value::String(close)] => Ok((open.clone(), close.clone())),
            _ => Err(SettingsError::InvalidBracketPair {
                field: field.to_string(),
                reason: "an array pair must be two strings: [open, close]",
            }),
        },
        _ => Err(SettingsError::InvalidBracketPair {
            field: field.to_string(),
            reason: "expected a two-character string or an [open, close] array",
        }),
    }
}

fn parse_palette(value: &Value, field: &str) -> Result<Vec<Color>, SettingsError> {
    let items = value.as_array().ok_or_else(|| SettingsError::NotAnArray {
        field: field.to_string(),
    })?;
    if items.is_empty() {
        return Err(SettingsError::EmptyPalette {
            field: field.to_string(),
        });
    }
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| parse_color(item, format!("{field}[{idx}]")))
        .collect()
}

fn parse_color(value: &Value, field: String) -> Result<Color, SettingsError> {
    match value.as_str() {
        Some(name) if !name.is_empty() => Ok(Color::from(name)),
        _ => Err(SettingsError::InvalidColor { field }),
    }
}
