pub mod decode;
pub mod diag;
pub mod document;
pub mod encode;
pub mod error;
pub mod io;
pub mod options;
pub mod schema;

mod refs;
mod utils;

use std::path::Path;

pub use crate::diag::{set_sink, DiagnosticSink, LogSink};
pub use crate::document::{
    Document, JsonArray, JsonObject, Kind, Node, NodeData, NodeDisplay, NodeId, Span,
};
pub use crate::error::Error;
pub use crate::io::{FsTextIo, TextIo};
pub use crate::options::{Indent, ParseOptions, WriteOptions, DEFAULT_MAX_DEPTH};
pub use crate::schema::{ValidationError, ValidationErrorKind};
pub use crate::utils::string::escape_string;

pub type Result<T> = std::result::Result<T, Error>;

pub fn parse(input: &str) -> Document {
    decode::parse(input)
}

pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Document> {
    decode::parse_with_options(input, options)
}

pub fn parse_object(input: &str) -> Document {
    decode::parse_object(input)
}

pub fn parse_object_with_options(input: &str, options: &ParseOptions) -> Result<Document> {
    decode::parse_object_with_options(input, options)
}

pub fn parse_array(input: &str) -> Document {
    decode::parse_array(input)
}

pub fn parse_array_with_options(input: &str, options: &ParseOptions) -> Result<Document> {
    decode::parse_array_with_options(input, options)
}

pub fn to_string(doc: &Document, id: NodeId) -> String {
    encode::to_string(doc, id)
}

pub fn to_string_with_options(doc: &Document, id: NodeId, options: &WriteOptions) -> String {
    encode::to_string_with_options(doc, id, options)
}

pub fn validate(doc: &Document, value: NodeId, schema: NodeId) -> Vec<ValidationError> {
    schema::validate(doc, value, schema)
}

pub fn load(path: impl AsRef<Path>) -> Document {
    io::load(path)
}

pub fn save(doc: &Document, id: NodeId, path: impl AsRef<Path>, options: &WriteOptions) -> Result<()> {
    io::save(doc, id, path, options)
}
