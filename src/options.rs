/// Depth at which the parser stops descending into nested containers.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Spaces(usize),
}

impl Indent {
    pub fn spaces(count: usize) -> Self {
        Indent::Spaces(count)
    }

    pub fn get_spaces(self) -> usize {
        match self {
            Indent::Spaces(count) => count,
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Spaces(2)
    }
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// When set, every recovery point becomes a hard parse error.
    pub strict: bool,
    /// Containers nested deeper than this are skipped and read as `Null`.
    pub max_depth: usize,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    pub formatted: bool,
    pub indent: Indent,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formatted(mut self, formatted: bool) -> Self {
        self.formatted = formatted;
        self
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }
}
