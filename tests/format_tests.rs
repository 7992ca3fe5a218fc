//! Tests pinning down the observable rules of the file format: markers,
//! quoting, comments, and the errors malformed input must produce.

use serde_succ::{Document, Error};

fn parse_err(input: &str) -> Error {
    Document::parse(input).expect_err("input should not parse")
}

fn line_of(err: &Error) -> usize {
    match err {
        Error::Format { line, .. } => *line,
        other => panic!("expected a format error, got {other}"),
    }
}

#[test]
fn null_marker_versus_quoted_null() {
    let doc = Document::parse("a: null\nb: \"null\"").unwrap();
    assert_eq!(doc.get::<Option<String>>("a").unwrap(), None);
    assert_eq!(doc.get::<Option<String>>("b").unwrap(), Some("null".into()));
}

#[test]
fn quoted_strings_unescape() {
    let doc = Document::parse("a: \"tab\\there, quote\\\" done\"").unwrap();
    assert_eq!(doc.get::<String>("a").unwrap(), "tab\there, quote\" done");
}

#[test]
fn unquoted_value_keeps_interior_spacing() {
    let doc = Document::parse("msg: hello there world").unwrap();
    assert_eq!(doc.get::<String>("msg").unwrap(), "hello there world");
}

#[test]
fn comment_needs_a_space_before_hash() {
    // A hash glued to the value is part of the value.
    let doc = Document::parse("color: red#dark").unwrap();
    assert_eq!(doc.get::<String>("color").unwrap(), "red#dark");
    assert_eq!(doc.node("color").unwrap().comment(), None);

    let doc = Document::parse("color: red # dark").unwrap();
    assert_eq!(doc.get::<String>("color").unwrap(), "red");
    assert_eq!(doc.node("color").unwrap().comment(), Some("# dark"));
}

#[test]
fn comment_survives_value_rewrite() {
    let mut doc = Document::parse("speed: 3 # units per tick").unwrap();
    doc.set("speed", &9).unwrap();
    assert_eq!(doc.to_text(), "speed: 9 # units per tick");
}

#[test]
fn list_items_may_nest() {
    let doc = Document::parse("grid:\n  -\n    - 1\n    - 2\n  -\n    - 3").unwrap();
    assert_eq!(
        doc.get::<Vec<Vec<i32>>>("grid").unwrap(),
        vec![vec![1, 2], vec![3]]
    );
}

#[test]
fn empty_container_reads_as_empty_collection() {
    let doc = Document::parse("items:").unwrap();
    assert_eq!(doc.get::<Vec<i32>>("items").unwrap(), Vec::<i32>::new());
}

#[test]
fn error_lines_are_one_based() {
    assert_eq!(line_of(&parse_err("ok: 1\n\tbad: 2")), 2);
    assert_eq!(line_of(&parse_err("not a data line")), 1);
    assert_eq!(line_of(&parse_err("a: 1\nb: 2\nc\n")), 3);
}

#[test]
fn structural_errors_abort_the_whole_parse() {
    // No partial document comes back from a file with one bad line.
    assert!(Document::parse("good: 1\nbad line\nalso_good: 2").is_err());
}

#[test]
fn sibling_rules_apply_per_parent() {
    // The same indentation under different parents is fine.
    let text = "a:\n  x: 1\nb:\n    y: 2";
    let doc = Document::parse(text).unwrap();
    assert_eq!(doc.to_text(), text);

    // Within one parent, siblings must line up.
    assert_eq!(line_of(&parse_err("a:\n  x: 1\n    y: 2")), 3);
}

#[test]
fn deeper_lines_after_a_leaf_are_rejected() {
    // A leaf has a value, so nothing can nest under it.
    let err = parse_err("a: 1\n  b: 2");
    assert!(matches!(err, Error::Format { .. }), "{err}");
}

#[test]
fn multi_line_marker_opens_a_block() {
    let text = "poem: \"\"\"\n  roses are red\n  violets are blue\n  \"\"\"";
    let doc = Document::parse(text).unwrap();
    assert_eq!(
        doc.get::<String>("poem").unwrap(),
        "roses are red\nviolets are blue"
    );
}

#[test]
fn block_lines_are_literal() {
    // Hashes and colons inside a block are text, not comments or keys.
    let text = "note: \"\"\"\n  # not a comment\n  key: not a key\n  \"\"\"";
    let doc = Document::parse(text).unwrap();
    assert_eq!(
        doc.get::<String>("note").unwrap(),
        "# not a comment\nkey: not a key"
    );
}

#[test]
fn terminator_line_may_carry_a_comment() {
    let text = "note: \"\"\"\n  body\n  \"\"\" # closes the note";
    let mut doc = Document::parse(text).unwrap();
    assert_eq!(doc.get::<String>("note").unwrap(), "body");
    assert_eq!(doc.to_text(), text);

    doc.set("note", "fresh body").unwrap();
    assert_eq!(
        doc.to_text(),
        "note: \"\"\"\n  fresh body\n  \"\"\" # closes the note"
    );
}

#[test]
fn written_output_never_ends_with_blank_lines() {
    let doc = Document::parse("a: 1\n\n\n\n").unwrap();
    assert_eq!(doc.to_text(), "a: 1");
}

#[test]
fn duplicate_keys_name_the_key() {
    let err = parse_err("volume: 1\nvolume: 2");
    assert!(err.to_string().contains("volume"), "{err}");
}
