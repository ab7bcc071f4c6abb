/// Escape special characters in a string for quoted output.
///
/// # Examples
/// ```
/// use jsondoc::escape_string;
///
/// assert_eq!(escape_string("hello\nworld"), "hello\\nworld");
/// ```
pub fn escape_string(s: &str) -> String {
    let mut result = Vec::with_capacity(s.len());

    escape_string_into(&mut result, s);

    String::from_utf8(result).expect("escaped output must be valid UTF-8")
}

pub(crate) fn escape_string_into(out: &mut Vec<u8>, s: &str) {
    let mut utf8 = [0u8; 4];
    for ch in s.chars() {
        match ch {
            '\n' => out.extend_from_slice(b"\\n"),
            '\r' => out.extend_from_slice(b"\\r"),
            '\t' => out.extend_from_slice(b"\\t"),
            '"' => out.extend_from_slice(b"\\\""),
            '\\' => out.extend_from_slice(b"\\\\"),
            _ => out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes()),
        }
    }
}
