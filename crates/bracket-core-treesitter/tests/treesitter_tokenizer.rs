use bracket_core::{
    BracketRange, Color, DocumentManager, DocumentSession, Settings, Token, TokenCategory,
    Tokenizer,
};
use bracket_core_treesitter::{TreeSitterLanguages, TreeSitterTokenizer, TreeSitterTokenizerConfig};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Instant;
use tree_sitter_rust::LANGUAGE;

fn rust_tokenizer() -> TreeSitterTokenizer {
    let config = TreeSitterTokenizerConfig::new(LANGUAGE.into()).with_default_rust_kinds();
    TreeSitterTokenizer::new(config).unwrap()
}

fn settings() -> Arc<Settings> {
    Arc::new(Settings::from_json_str(r#"{"timeOut": 0}"#).unwrap())
}

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

#[test]
fn test_leaf_text_reproduces_fixture() {
    let text = include_str!("fixtures/rust_sample.rs");
    let mut out = Vec::new();
    leaves(&rust_tokenizer().tokenize(text).unwrap(), &mut out);

    let joined: String = out.iter().map(|(_, text)| text.as_str()).collect();
    assert_eq!(joined, text);
    assert!(out.contains(&(
        Some(TokenCategory::String),
        "\"not a bracket: [\"".to_string()
    )));
    assert!(out.contains(&(Some(TokenCategory::Comment), "/* ) */".to_string())));
}

#[test]
fn test_fixture_brackets_are_grammar_aware() {
    let text = include_str!("fixtures/rust_sample.rs");
    let mut session = DocumentSession::new(settings(), rust_tokenizer(), text);
    let outcome = session.refresh();
    assert!(outcome.is_rendered());

    let colors = session.colors();
    assert!(colors.ranges(&Color::from("Red")).is_empty());
    // main(), the body braces, vec![(..)] and println!(..)
    assert_eq!(colors.range_count(), 10);
    assert_eq!(
        colors.color_of(&BracketRange::on_line(1, 10, 11)),
        Some(&Color::from("Gold"))
    );
    assert_eq!(
        colors.color_of(&BracketRange::on_line(7, 0, 1)),
        Some(&Color::from("Gold"))
    );
    assert_eq!(
        colors.color_of(&BracketRange::on_line(4, 16, 17)),
        Some(&Color::from("Orchid"))
    );
    assert_eq!(
        colors.color_of(&BracketRange::on_line(4, 17, 18)),
        Some(&Color::from("LightSkyBlue"))
    );
}

#[test]
fn test_syntax_errors_still_tokenize() {
    let text = "fn main( {\n    let x = [1, 2;\n";
    let mut out = Vec::new();
    leaves(&rust_tokenizer().tokenize(text).unwrap(), &mut out);
    let joined: String = out.iter().map(|(_, text)| text.as_str()).collect();
    assert_eq!(joined, text);
}

#[test]
fn test_manager_with_tree_sitter_languages() {
    let mut languages = TreeSitterLanguages::new();
    languages.register(
        "rust",
        TreeSitterTokenizerConfig::new(LANGUAGE.into()).with_default_rust_kinds(),
    );
    assert_eq!(languages.languages().collect::<Vec<_>>(), vec!["rust"]);

    let mut manager = DocumentManager::new(settings(), languages);
    assert!(manager.open("python", "()").is_err());

    let id = manager.open("rust", "fn f() {}\n").unwrap();
    assert_eq!(manager.session(id).unwrap().colors().range_count(), 4);

    // Opening a string literal swallows the rest of the line.
    let outcome = manager
        .edit(id, 0, "fn f() { \"}\" }\n", Instant::now())
        .unwrap();
    assert!(outcome.is_rendered());
    assert_eq!(outcome.colors().range_count(), 4);
    assert!(outcome.colors().ranges(&Color::from("Red")).is_empty());
}
