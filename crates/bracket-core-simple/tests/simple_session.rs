use bracket_core::{BracketRange, Color, DocumentManager, OpenError, Settings};
use bracket_core_simple::SimpleLanguages;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Instant;

const SOURCE: &str = r#"fn main() {
    // not a bracket: (
    let s = "not one either: ]";
    let v = vec![(1, 2)];
}"#;

fn settings() -> Arc<Settings> {
    Arc::new(
        Settings::from_json_str(
            r#"{
                "consecutivePairColors": ["()", "[]", "{}", ["Gold", "Orchid", "LightSkyBlue"], "Red"],
                "timeOut": 0,
                "excludedLanguages": ["plaintext"]
            }"#,
        )
        .unwrap(),
    )
}

#[test]
fn test_comments_and_strings_are_not_colored() {
    let mut manager = DocumentManager::new(settings(), SimpleLanguages::with_defaults().unwrap());
    let id = manager.open("rust", SOURCE).unwrap();
    let colors = manager.session(id).unwrap().colors();

    assert!(colors.ranges(&Color::from("Red")).is_empty());
    assert_eq!(
        colors.ranges(&Color::from("Gold")),
        &[
            BracketRange::on_line(0, 7, 8),
            BracketRange::on_line(0, 8, 9),
            BracketRange::on_line(0, 10, 11),
            BracketRange::on_line(4, 0, 1),
        ]
    );
    assert_eq!(
        colors.ranges(&Color::from("Orchid")),
        &[BracketRange::on_line(3, 16, 17), BracketRange::on_line(3, 23, 24)]
    );
    assert_eq!(
        colors.ranges(&Color::from("LightSkyBlue")),
        &[BracketRange::on_line(3, 17, 18), BracketRange::on_line(3, 22, 23)]
    );
}

#[test]
fn test_editing_a_comment_open_reveals_orphans() {
    let mut manager = DocumentManager::new(settings(), SimpleLanguages::with_defaults().unwrap());
    let id = manager.open("rust", SOURCE).unwrap();

    let uncommented = SOURCE.replace("// not a bracket: (", "not a bracket: (");
    manager.edit(id, 1, uncommented, Instant::now()).unwrap();

    let session = manager.session(id).unwrap();
    // The new `(` swallows the outer `}`, which becomes an orphan close; the `{` on line 0
    // is then never closed.
    assert_eq!(
        session.colors().ranges(&Color::from("Red")),
        &[
            BracketRange::on_line(0, 10, 11),
            BracketRange::on_line(1, 19, 20),
            BracketRange::on_line(4, 0, 1),
        ]
    );
}

#[test]
fn test_excluded_and_unknown_languages() {
    let mut manager = DocumentManager::new(settings(), SimpleLanguages::with_defaults().unwrap());
    assert_eq!(
        manager.open("plaintext", "()"),
        Err(OpenError::Excluded("plaintext".to_string()))
    );
    assert_eq!(
        manager.open("cobol", "()"),
        Err(OpenError::Unsupported("cobol".to_string()))
    );
    let id = manager.open("json", r#"{"a": ["]", 1]}"#).unwrap();
    let colors = manager.session(id).unwrap().colors();
    assert_eq!(colors.range_count(), 4);
    assert!(colors.ranges(&Color::from("Red")).is_empty());
}
