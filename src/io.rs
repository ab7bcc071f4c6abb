use std::fs;
use std::io;
use std::path::Path;

use crate::decode;
use crate::document::{Document, NodeId};
use crate::encode;
use crate::options::WriteOptions;
use crate::Result;

/// File access seam for [`load`] and [`save`]. Swap it out in tests or for
/// non-filesystem storage.
pub trait TextIo {
    fn read_text(&self, path: &Path) -> io::Result<String>;
    fn write_text(&self, path: &Path, text: &str) -> io::Result<()>;
}

/// [`TextIo`] over `std::fs`, reading and writing UTF-8.
pub struct FsTextIo;

impl TextIo for FsTextIo {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write_text(&self, path: &Path, text: &str) -> io::Result<()> {
        fs::write(path, text)
    }
}

/// Reads and leniently parses `path`. A file that cannot be read yields a
/// `Null` document, mirroring how the parser treats unreadable input.
pub fn load(path: impl AsRef<Path>) -> Document {
    load_with(&FsTextIo, path.as_ref())
}

pub fn load_with(device: &dyn TextIo, path: &Path) -> Document {
    match device.read_text(path) {
        Ok(text) => decode::parse(&text),
        Err(err) => {
            log::debug!("load failed for {}: {err}", path.display());
            Document::default()
        }
    }
}

/// Serializes the subtree at `id`, normalizes its newlines, and writes it
/// to `path`. Unlike loading, a failed write is a real error.
pub fn save(doc: &Document, id: NodeId, path: impl AsRef<Path>, options: &WriteOptions) -> Result<()> {
    save_with(&FsTextIo, doc, id, path.as_ref(), options, true)
}

pub fn save_with(
    device: &dyn TextIo,
    doc: &Document,
    id: NodeId,
    path: &Path,
    options: &WriteOptions,
    normalize: bool,
) -> Result<()> {
    let text = encode::to_string_with_options(doc, id, options);
    let text = if normalize {
        normalize_newlines(&text)
    } else {
        text
    };
    device.write_text(path, &text)?;
    Ok(())
}

/// Rewrites every `\r` to `\n`, then collapses each run of newlines into a
/// single one.
pub fn normalize_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = false;
    for ch in text.chars() {
        if ch == '\r' || ch == '\n' {
            pending = true;
        } else {
            if pending {
                out.push('\n');
                pending = false;
            }
            out.push(ch);
        }
    }
    if pending {
        out.push('\n');
    }
    out
}
