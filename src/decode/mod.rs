mod parser;

use parser::Parser;

use crate::document::Document;
use crate::options::ParseOptions;
use crate::Result;

/// Parses JSON text leniently. Malformed input produces a best-effort tree,
/// never an error; empty or whitespace-only input yields a `Null` document.
pub fn parse(input: &str) -> Document {
    parse_with_options(input, &ParseOptions::default()).unwrap_or_default()
}

/// Parses with explicit options. Only strict mode can fail: every point the
/// lenient parser recovers from becomes a hard error instead.
pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Document> {
    Parser::new(input, options).parse_document()
}

/// Parses text expected to start with a top-level object. A missing opener
/// is reported to the diagnostic sink and yields a `Null` document.
pub fn parse_object(input: &str) -> Document {
    parse_object_with_options(input, &ParseOptions::default()).unwrap_or_default()
}

pub fn parse_object_with_options(input: &str, options: &ParseOptions) -> Result<Document> {
    Parser::new(input, options).parse_container_document(b'{')
}

/// Parses text expected to start with a top-level array. A missing opener
/// is reported to the diagnostic sink and yields a `Null` document.
pub fn parse_array(input: &str) -> Document {
    parse_array_with_options(input, &ParseOptions::default()).unwrap_or_default()
}

pub fn parse_array_with_options(input: &str, options: &ParseOptions) -> Result<Document> {
    Parser::new(input, options).parse_container_document(b'[')
}
