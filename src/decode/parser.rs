use memchr::memchr2;

use crate::diag;
use crate::document::{Document, NodeId, Span};
use crate::options::ParseOptions;
use crate::{Error, Result};

/// Recursive-descent JSON reader over raw bytes. Every sub-parser leaves the
/// cursor on the last byte of its token; the shared wrapper in
/// [`Parser::parse_value`] then steps past it and eats trailing whitespace.
/// That single convention is what the recorded spans and the recovery
/// behavior of malformed input hang off, so keep it when touching anything
/// here.
pub(crate) struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    strict: bool,
    max_depth: usize,
    doc: Document,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: &ParseOptions) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            depth: 0,
            strict: options.strict,
            max_depth: options.max_depth,
            doc: Document::new(),
        }
    }

    /// Reads a document holding any top-level value. Empty and
    /// whitespace-only input keep the seeded `Null` root.
    pub fn parse_document(mut self) -> Result<Document> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Ok(self.doc);
        }
        self.finish_document()
    }

    /// Reads a document whose first significant byte must be `opener`
    /// (`{` or `[`). Anything else is reported and yields a `Null` document.
    pub fn parse_container_document(mut self, opener: u8) -> Result<Document> {
        self.skip_whitespace();
        if self.peek() != Some(opener) {
            self.recover_reported("Unexpected end of string")?;
            return Ok(self.doc);
        }
        self.finish_document()
    }

    fn finish_document(mut self) -> Result<Document> {
        let root = self.parse_value()?;
        if self.peek().is_some() {
            self.recover("unexpected trailing characters")?;
        }
        self.doc.set_root(root);
        self.doc.propagate_links(root);
        Ok(self.doc)
    }

    /// In lenient mode a recovery point is silent; in strict mode it is a
    /// hard error at the current offset.
    fn recover(&self, message: &str) -> Result<()> {
        if self.strict {
            Err(Error::parse(message, self.pos))
        } else {
            Ok(())
        }
    }

    /// Recovery point that additionally goes to the diagnostic sink when
    /// lenient.
    fn recover_reported(&self, message: &str) -> Result<()> {
        if self.strict {
            Err(Error::parse(message, self.pos))
        } else {
            diag::report_error(message);
            Ok(())
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn rest(&self) -> &str {
        self.input.get(self.pos..).unwrap_or("")
    }

    fn skip_whitespace(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Dispatches on the byte under the cursor, steps past the token's last
    /// byte, records the node's spans, and eats trailing whitespace. At end
    /// of input it produces a bare `Null` with the cursor untouched.
    fn parse_value(&mut self) -> Result<NodeId> {
        let Some(first) = self.peek() else {
            return Ok(self.doc.new_null());
        };
        let start = self.pos;
        let id = match first {
            b'"' => self.parse_string_value()?,
            b'0'..=b'9' | b'-' => self.parse_number_value()?,
            b'{' => self.parse_object_value()?,
            b'[' => self.parse_array_value()?,
            b't' | b'f' => self.parse_bool_literal(first)?,
            b'n' => self.parse_null_literal()?,
            _ => self.parse_unknown_value()?,
        };
        self.pos += 1;
        let end = self.pos.min(self.bytes.len());
        self.skip_whitespace();
        let node = self.doc.node_mut(id);
        node.key_span = Some(Span { start, end: start });
        node.value_span = Some(Span { start, end });
        Ok(id)
    }

    fn parse_unknown_value(&mut self) -> Result<NodeId> {
        let found = self
            .rest()
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        self.recover(&format!("unexpected character '{found}'"))?;
        Ok(self.doc.new_null())
    }

    /// Literals are matched by their first byte with a fixed-length skip, so
    /// a truncated `tru` still reads as `true` in lenient mode.
    fn parse_bool_literal(&mut self, first: u8) -> Result<NodeId> {
        let (value, literal) = if first == b't' {
            (true, "true")
        } else {
            (false, "false")
        };
        if !self.rest().starts_with(literal) {
            self.recover(&format!("expected '{literal}'"))?;
        }
        self.pos += literal.len() - 1;
        Ok(self.doc.new_bool(value))
    }

    fn parse_null_literal(&mut self) -> Result<NodeId> {
        if !self.rest().starts_with("null") {
            self.recover("expected 'null'")?;
        }
        self.pos += 3;
        Ok(self.doc.new_null())
    }

    fn parse_number_value(&mut self) -> Result<NodeId> {
        let start = self.pos;
        let mut end = self.pos;
        while let Some(b) = self.bytes.get(end) {
            match b {
                b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-' => end += 1,
                _ => break,
            }
        }
        let token = self.input.get(start..end).unwrap_or("");
        let value = match token.parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                self.recover(&format!("malformed number '{token}'"))?;
                0.0
            }
        };
        self.pos = end - 1;
        Ok(self.doc.new_number(value))
    }

    fn parse_string_value(&mut self) -> Result<NodeId> {
        let text = self.parse_string_token()?;
        Ok(self.doc.new_string(text))
    }

    /// Reads a quoted string with the cursor on the opening quote, leaving
    /// it on the closing quote. An unterminated string swallows the rest of
    /// the input. The undecoded run between `cursor` and the next special
    /// byte is copied lazily, so escape-free strings take one straight copy.
    fn parse_string_token(&mut self) -> Result<String> {
        let mut cursor = self.pos + 1;
        let mut owned: Option<String> = None;
        loop {
            let Some(offset) = memchr2(b'\\', b'"', &self.bytes[cursor..]) else {
                self.recover("unterminated string")?;
                let mut text = owned.take().unwrap_or_default();
                text.push_str(self.input.get(cursor..).unwrap_or(""));
                self.pos = self.bytes.len();
                return Ok(text);
            };
            let found = cursor + offset;
            if self.bytes[found] == b'"' {
                let mut text = owned.take().unwrap_or_default();
                text.push_str(self.input.get(cursor..found).unwrap_or(""));
                self.pos = found;
                return Ok(text);
            }
            let mut buf = owned.take().unwrap_or_default();
            buf.push_str(self.input.get(cursor..found).unwrap_or(""));
            cursor = self.decode_escape(found, &mut buf)?;
            owned = Some(buf);
        }
    }

    /// Decodes the escape at `start` (on the backslash) into `buf` and
    /// returns the byte offset right after it. Malformed escapes read as
    /// U+FFFD in lenient mode.
    fn decode_escape(&mut self, start: usize, buf: &mut String) -> Result<usize> {
        let Some(&code) = self.bytes.get(start + 1) else {
            self.recover("truncated escape sequence")?;
            buf.push(char::REPLACEMENT_CHARACTER);
            return Ok(start + 1);
        };
        let next = start + 2;
        match code {
            b'"' => buf.push('"'),
            b'\\' => buf.push('\\'),
            b'/' => buf.push('/'),
            b'b' => buf.push('\u{0008}'),
            b'f' => buf.push('\u{000C}'),
            b'n' => buf.push('\n'),
            b'r' => buf.push('\r'),
            b't' => buf.push('\t'),
            b'u' => return self.decode_unicode_escape(next, buf),
            _ => {
                self.recover("invalid escape sequence")?;
                buf.push(char::REPLACEMENT_CHARACTER);
            }
        }
        Ok(next)
    }

    fn decode_unicode_escape(&mut self, start: usize, buf: &mut String) -> Result<usize> {
        let Some(unit) = self.read_hex4(start) else {
            self.recover("invalid unicode escape")?;
            buf.push(char::REPLACEMENT_CHARACTER);
            return Ok((start + 4).min(self.bytes.len()));
        };
        let after = start + 4;
        if (0xD800..0xDC00).contains(&unit) {
            // High surrogate: a low surrogate escape must follow directly.
            if self.bytes.get(after) == Some(&b'\\') && self.bytes.get(after + 1) == Some(&b'u') {
                if let Some(low) = self.read_hex4(after + 2) {
                    if (0xDC00..0xE000).contains(&low) {
                        let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                        match char::from_u32(combined) {
                            Some(ch) => buf.push(ch),
                            None => buf.push(char::REPLACEMENT_CHARACTER),
                        }
                        return Ok(after + 6);
                    }
                }
            }
            self.recover("unpaired surrogate in unicode escape")?;
            buf.push(char::REPLACEMENT_CHARACTER);
            return Ok(after);
        }
        if (0xDC00..0xE000).contains(&unit) {
            self.recover("unpaired surrogate in unicode escape")?;
            buf.push(char::REPLACEMENT_CHARACTER);
            return Ok(after);
        }
        match char::from_u32(unit) {
            Some(ch) => buf.push(ch),
            None => buf.push(char::REPLACEMENT_CHARACTER),
        }
        Ok(after)
    }

    fn read_hex4(&self, start: usize) -> Option<u32> {
        let digits = self.bytes.get(start..start + 4)?;
        if !digits.iter().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let text = std::str::from_utf8(digits).ok()?;
        u32::from_str_radix(text, 16).ok()
    }

    fn parse_object_value(&mut self) -> Result<NodeId> {
        if self.depth >= self.max_depth {
            return self.skip_deep_container();
        }
        self.depth += 1;
        let id = self.doc.new_object();
        self.pos += 1;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    self.recover("unterminated object")?;
                    break;
                }
                Some(b'}') => break,
                Some(b'"') => {}
                Some(_) => {
                    self.recover("expected object key")?;
                    break;
                }
            }
            let key_start = self.pos;
            let key = self.parse_string_token()?;
            let key_end = (self.pos + 1).min(self.bytes.len());
            self.pos += 1;
            self.skip_whitespace();
            if self.peek() == Some(b':') {
                self.pos += 1;
                self.skip_whitespace();
            } else {
                self.recover("expected ':' after object key")?;
                break;
            }
            let value = self.parse_value()?;
            self.doc.node_mut(value).key_span = Some(Span {
                start: key_start,
                end: key_end,
            });
            self.doc.insert(id, key, value)?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => break,
                None => {
                    self.recover("unterminated object")?;
                    break;
                }
                Some(_) => {
                    self.recover("expected ',' or '}' in object")?;
                    break;
                }
            }
        }
        self.depth -= 1;
        Ok(id)
    }

    fn parse_array_value(&mut self) -> Result<NodeId> {
        if self.depth >= self.max_depth {
            return self.skip_deep_container();
        }
        self.depth += 1;
        let id = self.doc.new_array();
        self.pos += 1;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    self.recover("unterminated array")?;
                    break;
                }
                Some(b']') => break,
                Some(_) => {}
            }
            let element = self.parse_value()?;
            self.doc.push(id, element)?;
            // A separator is optional here: `[1 2]` reads as two elements.
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') | None => {}
                Some(_) => self.recover("expected ',' or ']' in array")?,
            }
        }
        self.depth -= 1;
        Ok(id)
    }

    fn skip_deep_container(&mut self) -> Result<NodeId> {
        self.recover("maximum nesting depth exceeded")?;
        self.skip_balanced();
        Ok(self.doc.new_null())
    }

    /// Consumes a balanced `{...}` or `[...]` run without building nodes,
    /// leaving the cursor on the closing bracket (or at end of input when
    /// unbalanced). Brackets inside strings do not count.
    fn skip_balanced(&mut self) {
        let mut level = 0usize;
        let mut in_string = false;
        while let Some(&b) = self.bytes.get(self.pos) {
            if in_string {
                match b {
                    b'\\' => self.pos += 1,
                    b'"' => in_string = false,
                    _ => {}
                }
            } else {
                match b {
                    b'"' => in_string = true,
                    b'{' | b'[' => level += 1,
                    b'}' | b']' => {
                        level -= 1;
                        if level == 0 {
                            return;
                        }
                    }
                    _ => {}
                }
            }
            self.pos += 1;
        }
    }
}
