use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};

use clap::Parser;
use jsondoc::{Document, Indent, NodeId, ParseOptions, WriteOptions};

#[derive(Parser, Debug)]
#[command(name = "jsondoc", version, about = "Lenient JSON document inspector")]
struct Args {
    /// Input file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Rewrite $ref members into resolved reference links before printing.
    #[arg(long)]
    resolve: bool,

    /// Validate the document against this schema file; violations go to
    /// stderr and the exit code is 1.
    #[arg(long, value_name = "file")]
    schema: Option<String>,

    /// Print only the subtree at this slash-separated path, e.g. "#/a/b".
    #[arg(long, value_name = "path")]
    path: Option<String>,

    /// Print without any whitespace.
    #[arg(long)]
    compact: bool,

    /// Indentation size for formatted output (default: 2).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,

    /// Fail on malformed input instead of recovering.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (input_text, input_source) = read_input(args.input.as_deref())?;

    let options = ParseOptions::new().with_strict(args.strict);
    let mut doc = jsondoc::parse_with_options(&input_text, &options)?;
    let root = doc.root();

    if args.resolve {
        doc.resolve_refs(root);
    }

    let target = match args.path.as_deref() {
        Some(path) => lookup(&doc, root, path)?,
        None => root,
    };

    if let Some(schema_path) = args.schema.as_deref() {
        check_schema(&mut doc, target, schema_path, &options)?;
    }

    let write_options = WriteOptions::new()
        .with_formatted(!args.compact)
        .with_indent(Indent::Spaces(args.indent));
    let rendered = jsondoc::to_string_with_options(&doc, target, &write_options);

    let output_target = OutputTarget::from_arg(args.output.as_deref());
    with_output_writer(output_target.path(), |writer| {
        writer.write_all(rendered.as_bytes())?;
        Ok(())
    })?;
    if let OutputTarget::File(path) = &output_target {
        report_status(&input_source, path);
    }
    Ok(())
}

fn lookup(doc: &Document, root: NodeId, path: &str) -> Result<NodeId, Box<dyn Error>> {
    let segments: Vec<&str> = path.split('/').collect();
    doc.lookup_path(root, &segments)
        .ok_or_else(|| format!("path '{path}' not found").into())
}

/// Grafts the schema file next to the document so both live in one arena,
/// resolves the schema's own $refs, and validates `target` against it.
fn check_schema(
    doc: &mut Document,
    target: NodeId,
    schema_path: &str,
    options: &ParseOptions,
) -> Result<(), Box<dyn Error>> {
    let schema_text = fs::read_to_string(schema_path)?;
    let schema_doc = jsondoc::parse_with_options(&schema_text, options)?;
    let schema = doc.adopt(&schema_doc, schema_doc.root());
    doc.resolve_refs(schema);

    let errors = jsondoc::validate(doc, target, schema);
    if errors.is_empty() {
        return Ok(());
    }
    for error in &errors {
        eprintln!("✘ {error}");
    }
    Err(format!("schema validation failed with {} error(s)", errors.len()).into())
}

fn read_input(input: Option<&str>) -> Result<(String, InputSource), Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read_to_string(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}

#[derive(Clone, Debug)]
enum OutputTarget {
    Stdout,
    File(String),
}

impl OutputTarget {
    fn from_arg(output: Option<&str>) -> Self {
        match output {
            Some(path) if path != "-" => OutputTarget::File(path.to_string()),
            _ => OutputTarget::Stdout,
        }
    }

    fn path(&self) -> Option<&str> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path.as_str()),
        }
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn report_status(input_source: &InputSource, output_path: &str) {
    let input_label = match input_source {
        InputSource::Stdin => "stdin",
        InputSource::File(path) => path.as_str(),
    };
    println!("✔ Wrote {input_label} → {output_path}");
}
