use crate::document::{Document, JsonArray, JsonObject, NodeData, NodeId};
use crate::options::WriteOptions;
use crate::utils::number::write_number_into;
use crate::utils::string::escape_string_into;

/// Byte-buffer serializer. Indent strings are cached per depth so nested
/// formatted output never rebuilds its prefix.
pub(crate) struct Writer<'a> {
    doc: &'a Document,
    buffer: Vec<u8>,
    formatted: bool,
    indent_unit: String,
    indent_cache: Vec<String>,
}

impl<'a> Writer<'a> {
    pub fn new(doc: &'a Document, options: &WriteOptions) -> Self {
        let indent_unit = " ".repeat(options.indent.get_spaces());
        Self {
            doc,
            buffer: Vec::new(),
            formatted: options.formatted,
            indent_unit,
            indent_cache: vec![String::new()],
        }
    }

    pub fn finish(self) -> String {
        String::from_utf8(self.buffer).expect("writer output must be valid UTF-8")
    }

    pub fn write_node(&mut self, id: NodeId, level: usize) {
        let doc = self.doc;
        match &doc.node(id).data {
            NodeData::Null => self.write_str("null"),
            NodeData::Bool(true) => self.write_str("true"),
            NodeData::Bool(false) => self.write_str("false"),
            NodeData::Number(value) => write_number_into(&mut self.buffer, *value),
            NodeData::String(text) => self.write_quoted(text),
            // A reference renders as its path, so writing a resolved
            // document gives back the text it was parsed from.
            NodeData::Reference { path, .. } => self.write_quoted(path),
            NodeData::Object(map) => self.write_object(map, level),
            NodeData::Array(items) => self.write_array(items, level),
        }
    }

    fn write_object(&mut self, map: &JsonObject, level: usize) {
        self.write_byte(b'{');
        if self.formatted {
            self.write_byte(b'\n');
        }
        let last = map.len().checked_sub(1);
        for (index, (key, &child)) in map.iter().enumerate() {
            if self.formatted {
                self.write_indent(level + 1);
            }
            self.write_quoted(key);
            self.write_byte(b':');
            if self.formatted {
                self.write_byte(b' ');
            }
            self.write_node(child, level + 1);
            if Some(index) != last {
                self.write_byte(b',');
            }
            if self.formatted {
                self.write_byte(b'\n');
            }
        }
        if self.formatted {
            self.write_indent(level);
        }
        self.write_byte(b'}');
    }

    fn write_array(&mut self, items: &JsonArray, level: usize) {
        self.write_byte(b'[');
        if self.formatted {
            self.write_byte(b'\n');
        }
        let last = items.len().checked_sub(1);
        for (index, &child) in items.iter().enumerate() {
            if self.formatted {
                self.write_indent(level + 1);
            }
            self.write_node(child, level + 1);
            if Some(index) != last {
                self.write_byte(b',');
            }
            if self.formatted {
                self.write_byte(b'\n');
            }
        }
        if self.formatted {
            self.write_indent(level);
        }
        self.write_byte(b']');
    }

    fn write_quoted(&mut self, text: &str) {
        self.write_byte(b'"');
        escape_string_into(&mut self.buffer, text);
        self.write_byte(b'"');
    }

    fn write_str(&mut self, s: &str) {
        self.buffer.extend_from_slice(s.as_bytes());
    }

    fn write_byte(&mut self, b: u8) {
        self.buffer.push(b);
    }

    fn write_indent(&mut self, depth: usize) {
        if depth == 0 || self.indent_unit.is_empty() {
            return;
        }
        if depth >= self.indent_cache.len() {
            self.extend_indent_cache(depth);
        }
        self.buffer
            .extend_from_slice(self.indent_cache[depth].as_bytes());
    }

    fn extend_indent_cache(&mut self, depth: usize) {
        while self.indent_cache.len() <= depth {
            let next = match self.indent_cache.last() {
                Some(prev) => {
                    let mut s = String::with_capacity(prev.len() + self.indent_unit.len());
                    s.push_str(prev);
                    s.push_str(&self.indent_unit);
                    s
                }
                None => String::new(),
            };
            self.indent_cache.push(next);
        }
    }
}
