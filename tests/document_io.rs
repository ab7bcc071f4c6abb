use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rstest::rstest;
use tempfile::TempDir;

use jsondoc::io::{load_with, save_with};
use jsondoc::{load, parse, save, to_string, Error, Kind, TextIo, WriteOptions};

/// [`TextIo`] backed by a map, for exercising load/save without a
/// filesystem.
#[derive(Default)]
struct MemoryIo {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryIo {
    fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl TextIo for MemoryIo {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        self.contents(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such entry"))
    }

    fn write_text(&self, path: &Path, text: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), text.to_string());
        Ok(())
    }
}

#[rstest]
fn test_save_then_load_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("doc.json");

    let doc = parse(r#"{"name": "Ada", "tags": [1, 2, null], "nested": {"ok": true}}"#);
    save(
        &doc,
        doc.root(),
        &path,
        &WriteOptions::new().with_formatted(true),
    )
    .unwrap();

    let loaded = load(&path);
    assert!(doc.deep_eq(doc.root(), &loaded, loaded.root()));
}

#[rstest]
fn test_save_compact_writes_exact_bytes() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("doc.json");

    let doc = parse(r#"{"a": 1, "b": [true, "x"]}"#);
    save(&doc, doc.root(), &path, &WriteOptions::new()).unwrap();

    let written = fs::read_to_string(&path).expect("read saved file");
    assert_eq!(written, r#"{"a":1,"b":[true,"x"]}"#);
}

#[rstest]
fn test_load_missing_file_yields_null_document() {
    let dir = TempDir::new().expect("tempdir");
    let doc = load(dir.path().join("absent.json"));
    assert_eq!(doc.kind(doc.root()), Kind::Null);
    assert_eq!(to_string(&doc, doc.root()), "null");
}

#[rstest]
fn test_load_parses_malformed_files_leniently() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{bad json").expect("write test file");

    let doc = load(&path);
    assert_eq!(doc.kind(doc.root()), Kind::Object);
    assert!(doc.as_object(doc.root()).unwrap().is_empty());
}

#[rstest]
fn test_save_surfaces_write_errors() {
    let dir = TempDir::new().expect("tempdir");
    let doc = parse("[1]");
    // The directory itself is not writable as a file.
    let err = save(&doc, doc.root(), dir.path(), &WriteOptions::new()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[rstest]
fn test_save_with_and_load_with_use_the_device() {
    let device = MemoryIo::default();
    let path = Path::new("virtual/doc.json");

    let doc = parse(r#"{"k": [1, 2]}"#);
    save_with(
        &device,
        &doc,
        doc.root(),
        path,
        &WriteOptions::new().with_formatted(true),
        true,
    )
    .unwrap();

    assert_eq!(
        device.contents(path).as_deref(),
        Some("{\n  \"k\": [\n    1,\n    2\n  ]\n}")
    );

    let loaded = load_with(&device, path);
    assert!(doc.deep_eq(doc.root(), &loaded, loaded.root()));
}

#[rstest]
fn test_load_with_read_error_yields_null_document() {
    let device = MemoryIo::default();
    let doc = load_with(&device, Path::new("nowhere.json"));
    assert_eq!(doc.kind(doc.root()), Kind::Null);
}

#[rstest]
#[case(true)]
#[case(false)]
fn test_save_with_passes_serialized_text_through(#[case] normalize: bool) {
    // The writer never emits carriage returns or blank lines, so
    // normalization leaves its output alone either way.
    let device = MemoryIo::default();
    let path = Path::new("out.json");

    let doc = parse(r#"{"text": "line1\nline2"}"#);
    let options = WriteOptions::new().with_formatted(true);
    save_with(&device, &doc, doc.root(), path, &options, normalize).unwrap();

    let expected = jsondoc::to_string_with_options(&doc, doc.root(), &options);
    assert_eq!(device.contents(path).as_deref(), Some(expected.as_str()));
}
