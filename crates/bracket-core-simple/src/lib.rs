//! `bracket-core-simple` - Simple (regex-based) tokenizers for `bracket-core`.
//!
//! Intended for languages where a grammar engine is unavailable or overkill. Rules mark
//! regions (comments, strings, ...) that must never count as punctuation; every run of
//! symbol characters outside those regions becomes a punctuation node.

use bracket_core::{Token, TokenCategory, TokenizeError, Tokenizer, TokenizerProvider};
use regex::Regex;
use std::collections::BTreeMap;

/// Default pattern for punctuation runs: anything that is neither a word character nor
/// whitespace.
pub const DEFAULT_PUNCTUATION: &str = r"[^\w\s]+";

/// A single region rule.
#[derive(Debug, Clone)]
pub struct RegexRule {
    pattern: String,
    category: TokenCategory,
}

impl RegexRule {
    /// Create a rule. The pattern is validated when the tokenizer is built.
    pub fn new(pattern: impl Into<String>, category: TokenCategory) -> Self {
        Self {
            pattern: pattern.into(),
            category,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn category(&self) -> &TokenCategory {
        &self.category
    }
}

/// A regex-driven [`Tokenizer`].
///
/// Rules are combined into one alternation; at any position the leftmost match wins, and
/// among rules matching at the same position the first registered one wins.
#[derive(Debug, Clone)]
pub struct SimpleTokenizer {
    rules: Vec<RegexRule>,
    regions: Option<Regex>,
    group_names: Vec<String>,
    punctuation: Regex,
}

impl SimpleTokenizer {
    pub fn new(rules: Vec<RegexRule>) -> Result<Self, regex::Error> {
        Self::with_punctuation(rules, DEFAULT_PUNCTUATION)
    }

    /// Like [`SimpleTokenizer::new`] with a custom punctuation-run pattern.
    pub fn with_punctuation(
        rules: Vec<RegexRule>,
        punctuation: &str,
    ) -> Result<Self, regex::Error> {
        let group_names: Vec<String> = (0..rules.len()).map(|i| format!("__r{i}")).collect();
        let regions = if rules.is_empty() {
            None
        } else {
            let alternation = rules
                .iter()
                .zip(&group_names)
                .map(|(rule, name)| format!("(?P<{name}>{})", rule.pattern))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation)?)
        };

        Ok(Self {
            rules,
            regions,
            group_names,
            punctuation: Regex::new(punctuation)?,
        })
    }

    pub fn rules(&self) -> &[RegexRule] {
        &self.rules
    }

    /// Line/block comments, double-quoted strings and character literals.
    pub fn c_like() -> Result<Self, regex::Error> {
        Self::new(vec![
            RegexRule::new(r"//[^\n]*", TokenCategory::Comment),
            RegexRule::new(r"/\*(?s:.)*?\*/", TokenCategory::Comment),
            RegexRule::new(r#""(?:\\.|[^"\\\n])*""#, TokenCategory::String),
            RegexRule::new(r"'(?:\\.|[^'\\\n])'", TokenCategory::String),
        ])
    }

    /// JSON strings (keys and values).
    pub fn json() -> Result<Self, regex::Error> {
        Self::new(vec![RegexRule::new(
            r#""(?:\\.|[^"\\])*""#,
            TokenCategory::String,
        )])
    }

    /// `#` comments and single- or double-quoted strings (shell, Python, TOML, YAML).
    pub fn hash_comments() -> Result<Self, regex::Error> {
        Self::new(vec![
            RegexRule::new(r"#[^\n]*", TokenCategory::Comment),
            RegexRule::new(r#""(?:\\.|[^"\\\n])*""#, TokenCategory::String),
            RegexRule::new(r"'(?:\\.|[^'\\\n])*'", TokenCategory::String),
        ])
    }

    /// No regions: every symbol run is punctuation.
    pub fn plain() -> Result<Self, regex::Error> {
        Self::new(Vec::new())
    }

    fn push_plain(&self, gap: &str, out: &mut Vec<Token>) {
        let mut last = 0;
        for m in self.punctuation.find_iter(gap) {
            if m.start() > last {
                out.push(Token::text(&gap[last..m.start()]));
            }
            out.push(Token::punctuation(m.as_str()));
            last = m.end();
        }
        if last < gap.len() {
            out.push(Token::text(&gap[last..]));
        }
    }
}

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&mut self, text: &str) -> Result<Token, TokenizeError> {
        let mut children = Vec::new();
        let mut cursor = 0;

        if let Some(regions) = &self.regions {
            for caps in regions.captures_iter(text) {
                let Some(m) = caps.get(0) else {
                    continue;
                };
                if m.is_empty() {
                    continue;
                }
                let Some(rule) = self
                    .group_names
                    .iter()
                    .position(|name| caps.name(name).is_some())
                    .map(|idx| &self.rules[idx])
                else {
                    continue;
                };

                self.push_plain(&text[cursor..m.start()], &mut children);
                children.push(Token::node(rule.category.clone(), Token::text(m.as_str())));
                cursor = m.end();
            }
        }
        self.push_plain(&text[cursor..], &mut children);

        Ok(Token::List(children))
    }
}

/// Language id → [`SimpleTokenizer`] table, usable as a
/// [`DocumentManager`](bracket_core::DocumentManager) provider.
#[derive(Debug, Clone, Default)]
pub struct SimpleLanguages {
    languages: BTreeMap<String, SimpleTokenizer>,
}

impl SimpleLanguages {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table covering common language ids.
    pub fn with_defaults() -> Result<Self, regex::Error> {
        let mut languages = Self::new();
        let c_like = SimpleTokenizer::c_like()?;
        for id in [
            "c",
            "cpp",
            "csharp",
            "go",
            "java",
            "javascript",
            "kotlin",
            "rust",
            "swift",
            "typescript",
        ] {
            languages.register(id, c_like.clone());
        }
        let hash = SimpleTokenizer::hash_comments()?;
        for id in ["python", "ruby", "shellscript", "toml", "yaml"] {
            languages.register(id, hash.clone());
        }
        languages.register("json", SimpleTokenizer::json()?);
        languages.register("plaintext", SimpleTokenizer::plain()?);
        Ok(languages)
    }

    pub fn register(&mut self, language: impl Into<String>, tokenizer: SimpleTokenizer) {
        self.languages.insert(language.into(), tokenizer);
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }
}

impl TokenizerProvider for SimpleLanguages {
    type Tokenizer = SimpleTokenizer;

    fn tokenizer_for(&self, language: &str) -> Option<SimpleTokenizer> {
        self.languages.get(language).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaves(token: &Token, out: &mut Vec<(Option<TokenCategory>, String)>) {
        match token {
            Token::Text(text) => out.push((None, text.clone())),
            Token::List(children) => children.iter().for_each(|c| leaves(c, out)),
            Token::Node { category, inner } => match inner.as_ref() {
                Token::Text(text) => out.push((Some(category.clone()), text.clone())),
                other => leaves(other, out),
            },
        }
    }

    fn tokenize(
        tokenizer: &mut SimpleTokenizer,
        text: &str,
    ) -> Vec<(Option<TokenCategory>, String)> {
        let mut out = Vec::new();
        leaves(&tokenizer.tokenize(text).unwrap(), &mut out);
        out
    }

    #[test]
    fn test_c_like_masks_comments_and_strings() {
        let mut tokenizer = SimpleTokenizer::c_like().unwrap();
        let tokens = tokenize(&mut tokenizer, "f(\"(\") // )\n");
        assert_eq!(
            tokens,
            vec![
                (None, "f".to_string()),
                (Some(TokenCategory::Punctuation), "(".to_string()),
                (Some(TokenCategory::String), "\"(\"".to_string()),
                (Some(TokenCategory::Punctuation), ")".to_string()),
                (None, " ".to_string()),
                (Some(TokenCategory::Comment), "// )".to_string()),
                (None, "\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_leaf_text_reproduces_document() {
        let text = "int main() {\n  /* { */ return a[\"]\"]; // }\n}\n";
        let mut tokenizer = SimpleTokenizer::c_like().unwrap();
        let joined: String = tokenize(&mut tokenizer, text)
            .into_iter()
            .map(|(_, text)| text)
            .collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_symbol_runs_stay_together() {
        let mut tokenizer = SimpleTokenizer::plain().unwrap();
        let tokens = tokenize(&mut tokenizer, "a(*b*)");
        assert_eq!(tokens[1], (Some(TokenCategory::Punctuation), "(*".to_string()));
        assert_eq!(tokens[3], (Some(TokenCategory::Punctuation), "*)".to_string()));
    }

    #[test]
    fn test_invalid_rule_is_rejected() {
        let err = SimpleTokenizer::new(vec![RegexRule::new("(", TokenCategory::Comment)]);
        assert!(err.is_err());
    }

    #[test]
    fn test_default_languages() {
        let languages = SimpleLanguages::with_defaults().unwrap();
        assert!(languages.tokenizer_for("rust").is_some());
        assert!(languages.tokenizer_for("json").is_some());
        assert!(languages.tokenizer_for("brainfuck").is_none());
        assert!(languages.languages().any(|l| l == "plaintext"));
    }
}
