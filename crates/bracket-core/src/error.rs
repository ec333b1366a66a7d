//! Error types.
//!
//! Configuration errors are fatal at construction time; tokenizer errors are recoverable and
//! only abort the current pass. Unmatched brackets are never errors.

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while validating bracket colorizer settings.
///
/// `field` values name the offending setting using the JSON settings path, e.g.
/// `consecutivePairColors[3][1]` or `independentPairColors[0]`.
pub enum SettingsError {
    #[error("settings JSON error: {0}")]
    /// The settings document could not be deserialized.
    Json(#[from] serde_json::Error),

    #[error("{field} is not an array")]
    /// An array was expected.
    NotAnArray {
        /// The offending field.
        field: String,
    },

    #[error("{field} expected at least {expected} elements, actual: {actual}")]
    /// An array is shorter than its required minimum.
    TooFewElements {
        /// The offending field.
        field: String,
        /// Minimum number of elements.
        expected: usize,
        /// Number of elements found.
        actual: usize,
    },

    #[error("{field} expected exactly {expected} elements, actual: {actual}")]
    /// An array does not have its required element count.
    WrongElementCount {
        /// The offending field.
        field: String,
        /// Required number of elements.
        expected: usize,
        /// Number of elements found.
        actual: usize,
    },

    #[error("{field} defines no bracket pairs")]
    /// No pair definitions were configured.
    NoPairDefinitions {
        /// The offending field.
        field: String,
    },

    #[error("{field} is not a bracket pair: {reason}")]
    /// A bracket pair is neither a two-character string nor a `[open, close]` array.
    InvalidBracketPair {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    #[error("{field} is an empty bracket literal")]
    /// An open or close literal is empty.
    EmptyLiteral {
        /// The offending field.
        field: String,
    },

    #[error("{field} uses the same literal '{literal}' to open and close")]
    /// Open and close literals are identical, so roles cannot be told apart.
    IdenticalLiterals {
        /// The offending field.
        field: String,
        /// The shared literal.
        literal: String,
    },

    #[error("{field} is an empty palette")]
    /// A palette has no colors.
    EmptyPalette {
        /// The offending field.
        field: String,
    },

    #[error("{field} is not a color string")]
    /// A palette entry or orphan color is missing, empty or not a string.
    InvalidColor {
        /// The offending field.
        field: String,
    },

    #[error("bracket literal pattern error: {0}")]
    /// The combined literal pattern failed to compile.
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors reported by a [`Tokenizer`](crate::Tokenizer).
pub enum TokenizeError {
    #[error("no grammar for language '{0}'")]
    /// The tokenizer cannot handle the document's language.
    UnsupportedLanguage(String),

    #[error("tokenization failed: {0}")]
    /// The tokenizer failed on this text.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors returned by [`DocumentManager::open`](crate::DocumentManager::open).
pub enum OpenError {
    #[error("language '{0}' is excluded from bracket colorization")]
    /// The language is listed in `excludedLanguages`.
    Excluded(String),

    #[error("no tokenizer for language '{0}'")]
    /// The tokenizer provider has nothing for this language.
    Unsupported(String),
}
