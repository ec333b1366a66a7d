use bracket_core::{Token, TokenCategory, TokenizeError, Tokenizer, TokenizerProvider};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tree_sitter::{Parser, Tree};

/// Errors produced while building a [`TreeSitterTokenizer`].
#[derive(Debug, Error)]
pub enum TreeSitterError {
    /// Setting the Tree-sitter language failed.
    #[error("tree-sitter language error: {0}")]
    Language(String),
}

/// Configuration for [`TreeSitterTokenizer`].
#[derive(Debug, Clone)]
pub struct TreeSitterTokenizerConfig {
    /// Tree-sitter language.
    pub language: tree_sitter::Language,
    /// Node kinds emitted as opaque [`TokenCategory::String`] nodes.
    pub string_kinds: BTreeSet<String>,
    /// Node kinds emitted as opaque [`TokenCategory::Comment`] nodes.
    pub comment_kinds: BTreeSet<String>,
}

impl TreeSitterTokenizerConfig {
    /// Create a config with no opaque kinds.
    pub fn new(language: tree_sitter::Language) -> Self {
        Self {
            language,
            string_kinds: BTreeSet::new(),
            comment_kinds: BTreeSet::new(),
        }
    }

    /// Add string-like node kinds.
    pub fn with_string_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.string_kinds.extend(kinds.into_iter().map(Into::into));
        self
    }

    /// Add comment node kinds.
    pub fn with_comment_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comment_kinds.extend(kinds.into_iter().map(Into::into));
        self
    }

    /// String and comment kinds of the `tree-sitter-rust` grammar.
    pub fn with_default_rust_kinds(self) -> Self {
        self.with_string_kinds(["string_literal", "raw_string_literal", "char_literal"])
            .with_comment_kinds(["line_comment", "block_comment"])
    }

    fn opaque_category(&self, kind: &str) -> Option<TokenCategory> {
        if self.string_kinds.contains(kind) {
            Some(TokenCategory::String)
        } else if self.comment_kinds.contains(kind) {
            Some(TokenCategory::Comment)
        } else {
            None
        }
    }
}

/// A [`Tokenizer`] backed by a Tree-sitter parser.
pub struct TreeSitterTokenizer {
    config: TreeSitterTokenizerConfig,
    parser: Parser,
}

impl std::fmt::Debug for TreeSitterTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeSitterTokenizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TreeSitterTokenizer {
    /// Create a new tokenizer from the given config.
    pub fn new(config: TreeSitterTokenizerConfig) -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        parser
            .set_language(&config.language)
            .map_err(|e| TreeSitterError::Language(e.to_string()))?;
        Ok(Self { config, parser })
    }

    /// The config this tokenizer was built from.
    pub fn config(&self) -> &TreeSitterTokenizerConfig {
        &self.config
    }

    fn flatten(&self, tree: &Tree, text: &str) -> Result<Token, TokenizeError> {
        let mut children = Vec::new();
        let mut emitted = 0;
        let mut cursor = tree.walk();

        loop {
            let node = cursor.node();
            let start = node.start_byte().max(emitted);
            let end = node.end_byte();

            let descend = match self.config.opaque_category(node.kind()) {
                Some(category) => {
                    if end > start {
                        push_gap(text, emitted, start, &mut children)?;
                        children.push(Token::node(category, Token::text(slice(text, start, end)?)));
                        emitted = end;
                    }
                    false
                }
                None if node.child_count() == 0 => {
                    if end > start {
                        push_gap(text, emitted, start, &mut children)?;
                        let leaf = slice(text, start, end)?;
                        children.push(if node.is_named() {
                            Token::node(
                                TokenCategory::Other(node.kind().to_string()),
                                Token::text(leaf),
                            )
                        } else if is_symbolic(leaf) {
                            Token::punctuation(leaf)
                        } else {
                            Token::text(leaf)
                        });
                        emitted = end;
                    }
                    false
                }
                None => true,
            };

            if descend && cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    push_gap(text, emitted, text.len(), &mut children)?;
                    return Ok(Token::List(children));
                }
            }
        }
    }
}

impl Tokenizer for TreeSitterTokenizer {
    fn tokenize(&mut self, text: &str) -> Result<Token, TokenizeError> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| TokenizeError::Failed("tree-sitter returned no tree".to_string()))?;
        self.flatten(&tree, text)
    }
}

fn slice(text: &str, start: usize, end: usize) -> Result<&str, TokenizeError> {
    text.get(start..end).ok_or_else(|| {
        TokenizeError::Failed(format!(
            "node range {start}..{end} does not fall on character boundaries"
        ))
    })
}

fn push_gap(
    text: &str,
    from: usize,
    to: usize,
    out: &mut Vec<Token>,
) -> Result<(), TokenizeError> {
    if to > from {
        out.push(Token::text(slice(text, from, to)?));
    }
    Ok(())
}

fn is_symbolic(leaf: &str) -> bool {
    !leaf.is_empty()
        && leaf
            .chars()
            .all(|c| !c.is_alphanumeric() && !c.is_whitespace() && c != '_')
}

/// Language id → [`TreeSitterTokenizerConfig`] table, usable as a
/// [`DocumentManager`](bracket_core::DocumentManager) provider.
#[derive(Debug, Clone, Default)]
pub struct TreeSitterLanguages {
    languages: BTreeMap<String, TreeSitterTokenizerConfig>,
}

impl TreeSitterLanguages {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the config for a language id.
    pub fn register(&mut self, language: impl Into<String>, config: TreeSitterTokenizerConfig) {
        self.languages.insert(language.into(), config);
    }

    /// Registered language ids.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }
}

impl TokenizerProvider for TreeSitterLanguages {
    type Tokenizer = TreeSitterTokenizer;

    fn tokenizer_for(&self, language: &str) -> Option<TreeSitterTokenizer> {
        let config = self.languages.get(language)?;
        match TreeSitterTokenizer::new(config.clone()) {
            Ok(tokenizer) => Some(tokenizer),
            Err(error) => {
                tracing::warn!(
                    target: "brackets.treesitter",
                    language,
                    %error,
                    "tokenizer_unavailable"
                );
                None
            }
        }
    }
}
