use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

/// Handle to a node inside a [`Document`](super::Document) arena. Ids are
/// only meaningful for the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Half-open byte range into the text a node was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Object,
    Array,
    Reference,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::Reference => "reference",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Object payload: insertion-ordered, keys deduplicated last-write-wins.
pub type JsonObject = IndexMap<SmolStr, NodeId>;

/// Array payload: node handles in element order.
pub type JsonArray = Vec<NodeId>;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(JsonObject),
    Array(JsonArray),
    /// Unowned link produced by reference resolution. `target` is `None`
    /// while the path has not (or could not) be resolved.
    Reference {
        path: String,
        target: Option<NodeId>,
    },
}

impl NodeData {
    pub fn kind(&self) -> Kind {
        match self {
            NodeData::Null => Kind::Null,
            NodeData::Bool(_) => Kind::Bool,
            NodeData::Number(_) => Kind::Number,
            NodeData::String(_) => Kind::String,
            NodeData::Object(_) => Kind::Object,
            NodeData::Array(_) => Kind::Array,
            NodeData::Reference { .. } => Kind::Reference,
        }
    }
}

/// Arena slot: payload plus upward links and source spans. Roots carry
/// `parent == None` and `root == Some(own id)` once links are propagated.
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub root: Option<NodeId>,
    pub key_span: Option<Span>,
    pub value_span: Option<Span>,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            root: None,
            key_span: None,
            value_span: None,
        }
    }
}
