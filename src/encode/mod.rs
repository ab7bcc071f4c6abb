mod writer;

use writer::Writer;

use crate::document::{Document, NodeId};
use crate::options::WriteOptions;

/// Renders the subtree at `id` as compact JSON text: no whitespace, keys
/// and values separated by a bare colon. Serialization cannot fail; any
/// node a document can hold has a rendering.
pub fn to_string(doc: &Document, id: NodeId) -> String {
    to_string_with_options(doc, id, &WriteOptions::default())
}

/// Renders with explicit options. Formatted output puts every member and
/// element on its own line, indented one level deeper than its container,
/// with `\n` newlines only.
pub fn to_string_with_options(doc: &Document, id: NodeId, options: &WriteOptions) -> String {
    let mut writer = Writer::new(doc, options);
    writer.write_node(id, 0);
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::{to_string, to_string_with_options};
    use crate::options::{Indent, WriteOptions};
    use crate::parse;

    #[rstest::rstest]
    fn test_compact_has_no_whitespace() {
        let doc = parse("{ \"a\" : [ 1 , true , \"x\" ] }");
        assert_eq!(to_string(&doc, doc.root()), r#"{"a":[1,true,"x"]}"#);
    }

    #[rstest::rstest]
    fn test_formatted_layout() {
        let doc = parse(r#"{"a":1,"b":[true]}"#);
        let options = WriteOptions::new().with_formatted(true);
        let text = to_string_with_options(&doc, doc.root(), &options);
        let expected = "{\n  \"a\": 1,\n  \"b\": [\n    true\n  ]\n}";
        assert_eq!(text, expected);
    }

    #[rstest::rstest]
    fn test_formatted_empty_containers_break_line() {
        let doc = parse("{}");
        let options = WriteOptions::new().with_formatted(true);
        assert_eq!(to_string_with_options(&doc, doc.root(), &options), "{\n}");

        let doc = parse("[]");
        assert_eq!(to_string_with_options(&doc, doc.root(), &options), "[\n]");
    }

    #[rstest::rstest]
    fn test_formatted_custom_indent() {
        let doc = parse(r#"{"a":1}"#);
        let options = WriteOptions::new()
            .with_formatted(true)
            .with_indent(Indent::spaces(4));
        assert_eq!(
            to_string_with_options(&doc, doc.root(), &options),
            "{\n    \"a\": 1\n}"
        );
    }

    #[rstest::rstest]
    fn test_escapes_in_keys_and_values() {
        let doc = parse(r#"{"ta\tb": "line\nbreak"}"#);
        assert_eq!(
            to_string(&doc, doc.root()),
            r#"{"ta\tb":"line\nbreak"}"#
        );
    }

    #[rstest::rstest]
    fn test_reference_renders_as_path() {
        let mut doc = parse(r##"{"item": {"$ref": "#/x"}, "x": 1}"##);
        let root = doc.root();
        doc.resolve_refs(root);
        assert_eq!(
            to_string(&doc, root),
            r##"{"item":"#/x","x":1}"##
        );
    }

    #[rstest::rstest]
    fn test_subtree_serialization() {
        let doc = parse(r#"{"outer": {"inner": [1,2]}}"#);
        let outer = doc.get(doc.root(), "outer").unwrap();
        assert_eq!(to_string(&doc, outer), r#"{"inner":[1,2]}"#);
    }
}
