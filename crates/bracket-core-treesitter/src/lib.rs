#![warn(missing_docs)]
//! `bracket-core-treesitter` - Tree-sitter tokenizers for `bracket-core`.
//!
//! A Tree-sitter parse tree is flattened into a `bracket_core::Token` tree:
//!
//! - anonymous leaves made only of symbol characters become punctuation nodes
//! - configured string and comment kinds become opaque nodes, so brackets inside them are
//!   never matched
//! - text between leaves (whitespace, skipped bytes) is kept as plain text
//!
//! The document is re-parsed from scratch on every pass.

mod tokenizer;

pub use tokenizer::{
    TreeSitterError, TreeSitterLanguages, TreeSitterTokenizer, TreeSitterTokenizerConfig,
};
