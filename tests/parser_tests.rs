// tests/parser_tests.rs

use rstest::rstest;
use tomless::lexer::tokenize;
use tomless::parser::Parser;
use tomless::{parse_text, Error, ParseErrorKind, Position, Table, Value};

fn table(pairs: Vec<(&str, Value)>) -> Value {
    let mut map = Table::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v);
    }
    Value::Table(map)
}

fn parse_kind(source: &str) -> ParseErrorKind {
    match parse_text(source) {
        Err(Error::Parse(e)) => e.kind,
        other => panic!("expected a parse error for {source:?}, got {other:?}"),
    }
}

// ============================================================================
// Key/value pairs
// ============================================================================

#[test]
fn test_scalars_at_root() {
    let root = parse_text(
        r#"
title = "TOML Example"
count = 42
ratio = 0.5
enabled = true
"#,
    )
    .unwrap();

    assert_eq!(root["title"], Value::String("TOML Example".into()));
    assert_eq!(root["count"], Value::Integer(42));
    assert_eq!(root["ratio"], Value::Float(0.5));
    assert_eq!(root["enabled"], Value::Boolean(true));
}

#[test]
fn test_parser_from_tokens() {
    let tokens = tokenize("a = 1").unwrap();
    let root = Parser::new(tokens).parse().unwrap();
    assert_eq!(root["a"], Value::Integer(1));
}

#[test]
fn test_empty_document() {
    assert!(parse_text("").unwrap().is_empty());
    assert!(parse_text("# only a comment\n\n").unwrap().is_empty());
}

#[test]
fn test_quoted_and_numeric_keys() {
    let root = parse_text("\"key with spaces\" = 1\n1234 = 2\ntrue = 3").unwrap();
    assert_eq!(root["key with spaces"], Value::Integer(1));
    assert_eq!(root["1234"], Value::Integer(2));
    assert_eq!(root["true"], Value::Integer(3));
}

#[test]
fn test_dotted_key_value() {
    let root = parse_text("physical.color = \"orange\"\nphysical.shape = \"round\"").unwrap();
    assert_eq!(
        root["physical"],
        table(vec![
            ("color", Value::String("orange".into())),
            ("shape", Value::String("round".into())),
        ])
    );
}

#[test]
fn test_insertion_order_is_kept() {
    let root = parse_text("zeta = 1\nalpha = 2\nmid = 3").unwrap();
    let keys: Vec<&str> = root.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_duplicate_key() {
    assert_eq!(
        parse_kind("x = 1\nx = 2"),
        ParseErrorKind::DuplicateKey { key: "x".into() }
    );
}

#[test]
fn test_duplicate_key_inside_table() {
    assert_eq!(
        parse_kind("[t]\nx = 1\nx = 2"),
        ParseErrorKind::DuplicateKey { key: "x".into() }
    );
}

#[test]
fn test_same_key_in_different_tables_is_fine() {
    let root = parse_text("x = 1\n[t]\nx = 2").unwrap();
    assert_eq!(root["x"], Value::Integer(1));
    assert_eq!(root["t"].get("x"), Some(&Value::Integer(2)));
}

#[test]
fn test_two_statements_on_one_line() {
    assert_eq!(parse_kind("a = 1 b = 2"), ParseErrorKind::MissingNewline);
    assert_eq!(parse_kind("[t] a = 1"), ParseErrorKind::MissingNewline);
}

#[test]
fn test_missing_value() {
    match parse_kind("a =") {
        ParseErrorKind::UnexpectedEof { expected } => assert_eq!(expected, "a value"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_missing_equals_reports_position() {
    match parse_text("a 1") {
        Err(Error::Parse(e)) => {
            assert_eq!(e.position, Position::new(1, 3));
            assert_eq!(
                e.kind,
                ParseErrorKind::Unexpected {
                    expected: "'='".into(),
                    found: "integer `1`".into(),
                }
            );
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[rstest]
#[case("+1 = 2", 1)]
#[case("a.+1 = 2", 3)]
#[case("[+1]", 2)]
fn test_signed_integer_is_not_a_key(#[case] source: &str, #[case] column: usize) {
    match parse_text(source) {
        Err(Error::Parse(e)) => {
            assert_eq!(e.position, Position::new(1, column));
            assert_eq!(
                e.kind,
                ParseErrorKind::Unexpected {
                    expected: "a key".into(),
                    found: "integer `+1`".into(),
                }
            );
        }
        other => panic!("expected a parse error for {source:?}, got {other:?}"),
    }
}

#[test]
fn test_negative_integer_is_a_bare_key() {
    let root = parse_text("-1 = 2").unwrap();
    assert_eq!(root["-1"], Value::Integer(2));
}

#[test]
fn test_bare_value_is_not_a_statement() {
    assert!(matches!(
        parse_kind("= 1"),
        ParseErrorKind::Unexpected { .. }
    ));
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn test_arrays() {
    let root = parse_text(
        r#"
ints = [1, 2, 3]
empty = []
trailing = [1, 2,]
nested = [[1, 2], ["a"]]
mixed = [1, "two", 3.0]
multi = [
    "x",
    "y",
]
"#,
    )
    .unwrap();

    assert_eq!(
        root["ints"],
        Value::Array(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)])
    );
    assert_eq!(root["empty"], Value::Array(vec![]));
    assert_eq!(root["trailing"].as_array().map(<[Value]>::len), Some(2));
    assert_eq!(
        root["nested"],
        Value::Array(vec![
            Value::Array(vec![Value::Integer(1), Value::Integer(2)]),
            Value::Array(vec![Value::String("a".into())]),
        ])
    );
    assert_eq!(
        root["mixed"],
        Value::Array(vec![
            Value::Integer(1),
            Value::String("two".into()),
            Value::Float(3.0),
        ])
    );
    assert_eq!(root["multi"].as_array().map(<[Value]>::len), Some(2));
}

#[rstest]
#[case("a = [,]")]
#[case("a = [1 2]")]
#[case("a = [1,,2]")]
#[case("a = [1")]
fn test_malformed_arrays(#[case] source: &str) {
    assert!(matches!(
        parse_text(source),
        Err(Error::Parse(_))
    ));
}

#[test]
fn test_array_of_inline_tables() {
    let root = parse_text("points = [{x = 1}, {x = 2}]").unwrap();
    assert_eq!(
        root["points"],
        Value::Array(vec![
            table(vec![("x", Value::Integer(1))]),
            table(vec![("x", Value::Integer(2))]),
        ])
    );
}

// ============================================================================
// Inline tables
// ============================================================================

#[test]
fn test_inline_table() {
    let root = parse_text("name = { first = \"Tom\", last = \"Preston-Werner\" }").unwrap();
    assert_eq!(
        root["name"],
        table(vec![
            ("first", Value::String("Tom".into())),
            ("last", Value::String("Preston-Werner".into())),
        ])
    );
}

#[test]
fn test_inline_table_does_not_change_current_table() {
    let root = parse_text("[a]\nb = {c = 1}\nd = 2").unwrap();
    assert_eq!(root["a"].get("d"), Some(&Value::Integer(2)));
    assert_eq!(root["a"].get_path(&["b", "c"]), Some(&Value::Integer(1)));
}

#[test]
fn test_inline_table_dotted_keys() {
    let root = parse_text("p = { pos.x = 1, pos.y = 2 }").unwrap();
    assert_eq!(root["p"].get_path(&["pos", "y"]), Some(&Value::Integer(2)));
}

#[test]
fn test_empty_inline_table() {
    let root = parse_text("e = {}").unwrap();
    assert_eq!(root["e"], Value::Table(Table::new()));
}

#[rstest]
#[case("t = {a = 1, a = 2}", ParseErrorKind::DuplicateKey { key: "a".into() })]
#[case("t = {a = {b = 1}, a.c = 2}", ParseErrorKind::InlineTableExtended { key: "a".into() })]
#[case("t = {a = 1}\n[t]", ParseErrorKind::InlineTableExtended { key: "t".into() })]
#[case("t = {a = 1}\n[t.b]", ParseErrorKind::InlineTableExtended { key: "t".into() })]
#[case("t = {a = 1}\nt.b = 2", ParseErrorKind::InlineTableExtended { key: "t".into() })]
fn test_inline_table_errors(#[case] source: &str, #[case] expected: ParseErrorKind) {
    assert_eq!(parse_kind(source), expected);
}

#[test]
fn test_inline_table_trailing_comma_rejected() {
    assert!(matches!(
        parse_kind("t = {a = 1,}"),
        ParseErrorKind::Unexpected { .. }
    ));
}

// ============================================================================
// Table headers
// ============================================================================

#[test]
fn test_nested_tables() {
    let root = parse_text(
        r#"
[servers]

[servers.alpha]
ip = "10.0.0.1"

[servers.beta]
ip = "10.0.0.2"
"#,
    )
    .unwrap();

    assert_eq!(
        root["servers"].get_path(&["alpha", "ip"]),
        Some(&Value::String("10.0.0.1".into()))
    );
    assert_eq!(
        root["servers"].get_path(&["beta", "ip"]),
        Some(&Value::String("10.0.0.2".into()))
    );
}

#[test]
fn test_implicit_table_can_be_defined_later() {
    let root = parse_text("[a.b]\nc = 1\n[a]\nd = 2").unwrap();
    assert_eq!(root["a"].get("d"), Some(&Value::Integer(2)));
    assert_eq!(root["a"].get_path(&["b", "c"]), Some(&Value::Integer(1)));
}

#[test]
fn test_dotted_keys_reopen_their_own_tables() {
    let root = parse_text("a.b.c = 1\na.b.d = 2\na.e = 3\n[a.b.f]\ng = 4").unwrap();
    assert_eq!(root["a"].get_path(&["b", "d"]), Some(&Value::Integer(2)));
    assert_eq!(root["a"].get("e"), Some(&Value::Integer(3)));
    assert_eq!(root["a"].get_path(&["b", "f", "g"]), Some(&Value::Integer(4)));
}

#[test]
fn test_quoted_header_segments() {
    let root = parse_text("[dog.\"tater.man\"]\ntype = \"pug\"").unwrap();
    assert_eq!(
        root["dog"].get_path(&["tater.man", "type"]),
        Some(&Value::String("pug".into()))
    );
}

#[rstest]
#[case("[a]\n[a]", ParseErrorKind::DuplicateTable { path: "a".into() })]
#[case("[a.b]\n[a.b]", ParseErrorKind::DuplicateTable { path: "a.b".into() })]
#[case("a = 1\n[a]", ParseErrorKind::DuplicateKey { key: "a".into() })]
#[case("a = 1\n[a.b]", ParseErrorKind::NotATable { key: "a".into() })]
#[case("[a]\nb = 1\n[a.b.c]", ParseErrorKind::NotATable { key: "b".into() })]
#[case("[a]\nb.c = 1\n[a.b]", ParseErrorKind::DuplicateTable { path: "a.b".into() })]
#[case("a.b = 1\n[a]", ParseErrorKind::DuplicateTable { path: "a".into() })]
#[case("a.b.c = 1\n[a]", ParseErrorKind::DuplicateTable { path: "a".into() })]
#[case("a.b.c = 1\n[a.b]", ParseErrorKind::DuplicateTable { path: "a.b".into() })]
#[case("[a.b]\nx = 1\n[a]\nb.y = 2", ParseErrorKind::DuplicateKey { key: "b".into() })]
#[case("[a.b.c]\nx = 1\n[a]\nb.c.y = 2", ParseErrorKind::DuplicateKey { key: "b".into() })]
#[case("a = [1]\n[[a]]", ParseErrorKind::StaticArray { key: "a".into() })]
#[case("[a]\n[[a]]", ParseErrorKind::DuplicateKey { key: "a".into() })]
#[case("[[a]]\n[a]", ParseErrorKind::DuplicateKey { key: "a".into() })]
fn test_table_errors(#[case] source: &str, #[case] expected: ParseErrorKind) {
    assert_eq!(parse_kind(source), expected);
}

#[rstest]
#[case("[]")]
#[case("[a")]
#[case("[a.]")]
#[case("[[a]")]
#[case("[[a] ]")]
#[case("[a = 1]")]
fn test_malformed_headers(#[case] source: &str) {
    assert!(matches!(parse_text(source), Err(Error::Parse(_))), "{source}");
}

// ============================================================================
// Arrays of tables
// ============================================================================

#[test]
fn test_array_of_tables() {
    let root = parse_text(
        r#"
[[products]]
name = "Hammer"
sku = 738594937

[[products]]

[[products]]
name = "Nail"
color = "gray"
"#,
    )
    .unwrap();

    let products = root["products"].as_array().unwrap();
    assert_eq!(products.len(), 3);
    assert_eq!(products[0].get("sku"), Some(&Value::Integer(738594937)));
    assert_eq!(products[1], Value::Table(Table::new()));
    assert_eq!(products[2].get("color"), Some(&Value::String("gray".into())));
}

#[test]
fn test_sub_tables_of_array_elements() {
    let root = parse_text(
        r#"
[[fruit]]
name = "apple"

[fruit.physical]
color = "red"

[[fruit.variety]]
name = "red delicious"

[[fruit.variety]]
name = "granny smith"

[[fruit]]
name = "banana"

[fruit.physical]
color = "yellow"
"#,
    )
    .unwrap();

    let fruit = root["fruit"].as_array().unwrap();
    assert_eq!(fruit.len(), 2);
    assert_eq!(
        fruit[0].get_path(&["physical", "color"]),
        Some(&Value::String("red".into()))
    );
    assert_eq!(fruit[0].get("variety").and_then(Value::as_array).map(<[Value]>::len), Some(2));
    assert_eq!(
        fruit[1].get_path(&["physical", "color"]),
        Some(&Value::String("yellow".into()))
    );
    assert!(fruit[1].get("variety").is_none());
}

// ============================================================================
// Coercion errors surface through the parser
// ============================================================================

#[test]
fn test_coercion_error_is_not_a_parse_error() {
    assert!(matches!(
        parse_text("big = 9223372036854775808"),
        Err(Error::Coercion(_))
    ));
    assert!(matches!(
        parse_text("d = 2023-13-01"),
        Err(Error::Coercion(_))
    ));
}

#[test]
fn test_lex_error_is_propagated() {
    assert!(matches!(parse_text("s = \"a\\\"b\""), Err(Error::Lex(_))));
}
