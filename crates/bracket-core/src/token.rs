//! Token tree model and the tokenizer seam.
//!
//! A tokenizer (grammar engine, Tree-sitter, regex rules, ...) turns the whole document text
//! into a [`Token`] tree. The engine only cares about two things:
//!
//! - the concatenation of all leaf texts, in traversal order, which must reproduce the
//!   document so positions can be derived from it
//! - which leaves are wrapped in a [`TokenCategory::Punctuation`] node, since only those are
//!   searched for bracket literals

use crate::error::TokenizeError;

/// Category tag carried by a [`Token::Node`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// Punctuation. The only category whose leaf text is searched for bracket literals.
    Punctuation,
    /// Comments.
    Comment,
    /// String and character literals.
    String,
    /// Any other grammar-specific tag.
    Other(String),
}

impl TokenCategory {
    /// Returns `true` for [`TokenCategory::Punctuation`].
    pub fn is_punctuation(&self) -> bool {
        matches!(self, Self::Punctuation)
    }
}

/// A node of the token tree.
///
/// The tree may recurse through any of the three shapes; traversal in
/// [`map_occurrences`](crate::map_occurrences) uses an explicit work stack, so arbitrarily deep
/// trees are fine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal document text.
    Text(String),
    /// Children in document order.
    List(Vec<Token>),
    /// A tagged node wrapping a leaf, a list, or another node.
    Node {
        /// The node's category.
        category: TokenCategory,
        /// The wrapped token.
        inner: Box<Token>,
    },
}

impl Token {
    /// Create a text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a tagged node around `inner`.
    pub fn node(category: TokenCategory, inner: Token) -> Self {
        Self::Node {
            category,
            inner: Box::new(inner),
        }
    }

    /// Create a punctuation node around a text leaf.
    pub fn punctuation(text: impl Into<String>) -> Self {
        Self::node(TokenCategory::Punctuation, Self::text(text))
    }
}

/// Produces a token tree for a whole document.
///
/// Failures must be reported as [`TokenizeError`], never as an empty tree: an empty tree means
/// "no brackets", which is a different outcome.
pub trait Tokenizer {
    /// Tokenize the full document text.
    fn tokenize(&mut self, text: &str) -> Result<Token, TokenizeError>;
}

impl<F> Tokenizer for F
where
    F: FnMut(&str) -> Result<Token, TokenizeError>,
{
    fn tokenize(&mut self, text: &str) -> Result<Token, TokenizeError> {
        self(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_tokenizer() {
        let mut tokenizer = |text: &str| -> Result<Token, TokenizeError> { Ok(Token::text(text)) };
        assert_eq!(tokenizer.tokenize("abc").unwrap(), Token::text("abc"));
    }

    #[test]
    fn test_boxed_tokenizer_reports_failure() {
        let mut tokenizer: Box<dyn FnMut(&str) -> Result<Token, TokenizeError>> =
            Box::new(|_: &str| Err(TokenizeError::UnsupportedLanguage("cobol".to_string())));
        assert_eq!(
            tokenizer.tokenize("x"),
            Err(TokenizeError::UnsupportedLanguage("cobol".to_string()))
        );
    }
}
