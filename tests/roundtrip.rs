use rstest::rstest;

use jsondoc::{parse, to_string, to_string_with_options, WriteOptions};

#[rstest]
#[case(r#"{"name":"Ada","age":36,"tags":["x","y"],"meta":null}"#)]
#[case(r#"[1,2.5,true,false,null,"s"]"#)]
#[case(r#"{"nested":{"deep":{"deeper":[{"a":1},{"b":[]}]}}}"#)]
#[case(r#""just a string""#)]
#[case("42")]
#[case("true")]
#[case("null")]
#[case("{}")]
#[case("[]")]
fn test_reparse_serialized_text_is_equal(#[case] input: &str) {
    let first = parse(input);
    let text = to_string(&first, first.root());
    let second = parse(&text);
    assert!(first.deep_eq(first.root(), &second, second.root()));
    // Compact text is a fixed point after one round.
    assert_eq!(to_string(&second, second.root()), text);
}

#[rstest]
fn test_formatted_reparse_is_equal() {
    let first = parse(r#"{"a":[1,{"b":null}],"c":"x"}"#);
    let options = WriteOptions::new().with_formatted(true);
    let text = to_string_with_options(&first, first.root(), &options);
    let second = parse(&text);
    assert!(first.deep_eq(first.root(), &second, second.root()));
}

#[rstest]
fn test_member_order_survives() {
    let doc = parse(r#"{"z":1,"a":2,"m":3}"#);
    assert_eq!(to_string(&doc, doc.root()), r#"{"z":1,"a":2,"m":3}"#);
}

#[rstest]
fn test_duplicate_key_keeps_first_slot_last_value() {
    let doc = parse(r#"{"a":1,"b":2,"a":3}"#);
    assert_eq!(to_string(&doc, doc.root()), r#"{"a":3,"b":2}"#);
}

#[rstest]
#[case("1.0", "1")]
#[case("1.50", "1.5")]
#[case("-0.0", "0")]
#[case("1e3", "1000")]
#[case("1e-3", "0.001")]
#[case("3.14", "3.14")]
#[case("-7", "-7")]
fn test_numbers_render_canonically(#[case] input: &str, #[case] expected: &str) {
    let doc = parse(input);
    assert_eq!(to_string(&doc, doc.root()), expected);
}

#[rstest]
fn test_tiny_and_huge_numbers_round_trip() {
    let first = parse("[1e-300,1e300,-2.5e-20]");
    let text = to_string(&first, first.root());
    assert_eq!(
        text,
        format!(
            "[0.{zeros299}1,1{zeros300},-0.{zeros19}25]",
            zeros299 = "0".repeat(299),
            zeros300 = "0".repeat(300),
            zeros19 = "0".repeat(19),
        )
    );
    let second = parse(&text);
    assert!(first.deep_eq(first.root(), &second, second.root()));
}

#[rstest]
fn test_ref_document_round_trips_as_path_text() {
    let input = r##"{"item":{"$ref":"#/defs/x"},"defs":{"x":5}}"##;
    let mut doc = parse(input);
    let root = doc.root();
    doc.resolve_refs(root);

    let text = to_string(&doc, root);
    assert_eq!(text, r##"{"item":"#/defs/x","defs":{"x":5}}"##);

    // Reparsing gives the path as a plain string, which deep_eq treats as
    // equal to the reference it came from.
    let second = parse(&text);
    assert!(doc.deep_eq(root, &second, second.root()));
}

#[rstest]
fn test_clone_idempotence() {
    let mut doc = parse(r#"{"a":[1,2],"b":{"c":true}}"#);
    let root = doc.root();
    let once = doc.clone_subtree(root);
    let twice = doc.clone_subtree(once);

    let snapshot = doc.clone();
    assert!(doc.deep_eq(once, &snapshot, twice));
    assert_eq!(to_string(&doc, once), to_string(&doc, root));
    assert_eq!(to_string(&doc, twice), to_string(&doc, root));
}

#[rstest]
fn test_escaped_strings_round_trip() {
    let input = r#"{"text":"line\nbreak\ttab\\slash\"quote"}"#;
    let first = parse(input);
    let text = to_string(&first, first.root());
    assert_eq!(text, input);
    let second = parse(&text);
    assert!(first.deep_eq(first.root(), &second, second.root()));
}

#[rstest]
fn test_unicode_escape_round_trips_as_literal() {
    // \u escapes decode on parse and re-serialize as raw UTF-8.
    let doc = parse(r#""café 🎉""#);
    assert_eq!(to_string(&doc, doc.root()), "\"café 🎉\"");
}
