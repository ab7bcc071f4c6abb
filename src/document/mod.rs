mod node;

use std::fmt;

use smallvec::SmallVec;
use smol_str::SmolStr;

pub use self::node::{JsonArray, JsonObject, Kind, Node, NodeData, NodeId, Span};

use crate::diag;
use crate::{Error, Result};

type ChildBuf = SmallVec<[NodeId; 16]>;

/// Arena of JSON nodes. Every tree lives in one flat `Vec`; handles index
/// into it and stay valid for the document's lifetime, because slots are
/// never freed or reused. Mutations detach subtrees instead of deleting
/// them, so a stale handle reads stale data rather than dangling.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// A document holding a single `Null` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Null)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = id;
    }

    /// Borrows a node slot.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this document.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> Kind {
        self.node(id).data.kind()
    }

    pub(crate) fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn new_null(&mut self) -> NodeId {
        self.push_node(Node::new(NodeData::Null))
    }

    pub fn new_bool(&mut self, value: bool) -> NodeId {
        self.push_node(Node::new(NodeData::Bool(value)))
    }

    /// Numbers are always finite; NaN and the infinities fall back to `Null`.
    pub fn new_number(&mut self, value: f64) -> NodeId {
        if value.is_finite() {
            self.push_node(Node::new(NodeData::Number(value)))
        } else {
            self.new_null()
        }
    }

    pub fn new_string(&mut self, value: impl Into<String>) -> NodeId {
        self.push_node(Node::new(NodeData::String(value.into())))
    }

    pub fn new_object(&mut self) -> NodeId {
        self.push_node(Node::new(NodeData::Object(JsonObject::new())))
    }

    pub fn new_array(&mut self) -> NodeId {
        self.push_node(Node::new(NodeData::Array(JsonArray::new())))
    }

    pub fn new_reference(&mut self, path: impl Into<String>) -> NodeId {
        self.push_node(Node::new(NodeData::Reference {
            path: path.into(),
            target: None,
        }))
    }

    pub fn as_bool(&self, id: NodeId) -> Result<bool> {
        match &self.node(id).data {
            NodeData::Bool(value) => Ok(*value),
            other => Err(Error::type_mismatch(Kind::Bool, other.kind())),
        }
    }

    pub fn as_number(&self, id: NodeId) -> Result<f64> {
        match &self.node(id).data {
            NodeData::Number(value) => Ok(*value),
            other => Err(Error::type_mismatch(Kind::Number, other.kind())),
        }
    }

    pub fn as_str(&self, id: NodeId) -> Result<&str> {
        match &self.node(id).data {
            NodeData::String(value) => Ok(value),
            other => Err(Error::type_mismatch(Kind::String, other.kind())),
        }
    }

    pub fn as_object(&self, id: NodeId) -> Result<&JsonObject> {
        match &self.node(id).data {
            NodeData::Object(map) => Ok(map),
            other => Err(Error::type_mismatch(Kind::Object, other.kind())),
        }
    }

    pub fn as_object_mut(&mut self, id: NodeId) -> Result<&mut JsonObject> {
        match &mut self.node_mut(id).data {
            NodeData::Object(map) => Ok(map),
            other => Err(Error::type_mismatch(Kind::Object, other.kind())),
        }
    }

    pub fn as_array(&self, id: NodeId) -> Result<&JsonArray> {
        match &self.node(id).data {
            NodeData::Array(items) => Ok(items),
            other => Err(Error::type_mismatch(Kind::Array, other.kind())),
        }
    }

    pub fn as_array_mut(&mut self, id: NodeId) -> Result<&mut JsonArray> {
        match &mut self.node_mut(id).data {
            NodeData::Array(items) => Ok(items),
            other => Err(Error::type_mismatch(Kind::Array, other.kind())),
        }
    }

    /// Member lookup on an object node.
    pub fn get(&self, id: NodeId, key: &str) -> Result<NodeId> {
        let map = self.as_object(id)?;
        map.get(key).copied().ok_or_else(|| Error::key_not_found(key))
    }

    /// Element lookup on an array node.
    pub fn at(&self, id: NodeId, index: usize) -> Result<NodeId> {
        let items = self.as_array(id)?;
        items
            .get(index)
            .copied()
            .ok_or_else(|| Error::index_out_of_bounds(index, items.len()))
    }

    pub fn contains_key(&self, id: NodeId, key: &str) -> Result<bool> {
        Ok(self.as_object(id)?.contains_key(key))
    }

    /// Element count of an array node.
    pub fn len(&self, id: NodeId) -> Result<usize> {
        Ok(self.as_array(id)?.len())
    }

    /// Inserts or replaces a member; a repeated key keeps its slot and takes
    /// the new value.
    pub fn insert(&mut self, id: NodeId, key: impl Into<SmolStr>, value: NodeId) -> Result<()> {
        self.as_object_mut(id)?.insert(key.into(), value);
        Ok(())
    }

    pub fn push(&mut self, id: NodeId, value: NodeId) -> Result<()> {
        self.as_array_mut(id)?.push(value);
        Ok(())
    }

    pub fn set_at(&mut self, id: NodeId, index: usize, value: NodeId) -> Result<()> {
        let items = self.as_array_mut(id)?;
        let len = items.len();
        match items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::index_out_of_bounds(index, len)),
        }
    }

    /// Removes an array element. An out-of-range index is reported to the
    /// diagnostic sink and the array is left untouched.
    pub fn remove(&mut self, id: NodeId, index: usize) -> Result<()> {
        let items = self.as_array_mut(id)?;
        let len = items.len();
        if index < len {
            items.remove(index);
        } else {
            diag::report_error(&format!(
                "index out of range: {index} (Expected 0 <= index < {len})"
            ));
        }
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Root of the tree `id` belongs to; a node with no propagated links is
    /// its own root.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.node(id).root.unwrap_or(id)
    }

    pub fn key_span(&self, id: NodeId) -> Option<Span> {
        self.node(id).key_span
    }

    pub fn value_span(&self, id: NodeId) -> Option<Span> {
        self.node(id).value_span
    }

    /// Rewrites `parent` and `root` links for the whole tree under `root`.
    /// Call after grafting subtrees built out of band.
    pub fn propagate_links(&mut self, root: NodeId) {
        self.relink(root, None, root);
    }

    fn relink(&mut self, id: NodeId, parent: Option<NodeId>, root: NodeId) {
        {
            let node = self.node_mut(id);
            node.parent = parent;
            node.root = Some(root);
        }
        let children: ChildBuf = match &self.node(id).data {
            NodeData::Object(map) => map.values().copied().collect(),
            NodeData::Array(items) => items.iter().copied().collect(),
            _ => return,
        };
        for child in children {
            self.relink(child, Some(id), root);
        }
    }

    /// Deep copy of the subtree at `id` into fresh nodes. Links, spans, and
    /// reference targets are cleared on the copy; reference paths survive.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let source = self.node(id).data.clone();
        let data = match source {
            NodeData::Object(map) => {
                let mut copy = JsonObject::with_capacity(map.len());
                for (key, child) in map {
                    let cloned = self.clone_subtree(child);
                    copy.insert(key, cloned);
                }
                NodeData::Object(copy)
            }
            NodeData::Array(items) => {
                let mut copy = JsonArray::with_capacity(items.len());
                for child in items {
                    copy.push(self.clone_subtree(child));
                }
                NodeData::Array(copy)
            }
            NodeData::Reference { path, .. } => NodeData::Reference { path, target: None },
            leaf => leaf,
        };
        self.push_node(Node::new(data))
    }

    /// Deep copy of a subtree of `source` into this document, returning the
    /// copy's root. The copy arrives with cleared links, spans, and
    /// reference targets, same as [`Self::clone_subtree`].
    pub fn adopt(&mut self, source: &Document, id: NodeId) -> NodeId {
        let data = match &source.node(id).data {
            NodeData::Object(map) => {
                let mut copy = JsonObject::with_capacity(map.len());
                for (key, &child) in map {
                    let adopted = self.adopt(source, child);
                    copy.insert(key.clone(), adopted);
                }
                NodeData::Object(copy)
            }
            NodeData::Array(items) => {
                let mut copy = JsonArray::with_capacity(items.len());
                for &child in items {
                    let adopted = self.adopt(source, child);
                    copy.push(adopted);
                }
                NodeData::Array(copy)
            }
            NodeData::Reference { path, .. } => NodeData::Reference {
                path: path.clone(),
                target: None,
            },
            leaf => leaf.clone(),
        };
        self.push_node(Node::new(data))
    }

    /// New array holding deep copies of the elements of `a` then of `b`.
    /// Neither source is touched.
    pub fn concat(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        let first: JsonArray = self.as_array(a)?.clone();
        let second: JsonArray = self.as_array(b)?.clone();
        let mut items = JsonArray::with_capacity(first.len() + second.len());
        for child in first.into_iter().chain(second) {
            let cloned = self.clone_subtree(child);
            items.push(cloned);
        }
        Ok(self.push_node(Node::new(NodeData::Array(items))))
    }

    /// Structural equality on payloads. Links and spans are ignored, object
    /// member order is ignored, and a reference compares equal to the string
    /// of its path so resolved documents match their serialized form.
    pub fn deep_eq(&self, a: NodeId, other: &Document, b: NodeId) -> bool {
        match (&self.node(a).data, &other.node(b).data) {
            (NodeData::Null, NodeData::Null) => true,
            (NodeData::Bool(x), NodeData::Bool(y)) => x == y,
            (NodeData::Number(x), NodeData::Number(y)) => x == y,
            (NodeData::String(x), NodeData::String(y)) => x == y,
            (NodeData::Reference { path: x, .. }, NodeData::Reference { path: y, .. }) => x == y,
            (NodeData::Reference { path, .. }, NodeData::String(text))
            | (NodeData::String(text), NodeData::Reference { path, .. }) => path == text,
            (NodeData::Object(x), NodeData::Object(y)) => {
                x.len() == y.len()
                    && x.iter().all(|(key, &xa)| {
                        y.get(key).is_some_and(|&ya| self.deep_eq(xa, other, ya))
                    })
            }
            (NodeData::Array(x), NodeData::Array(y)) => {
                x.len() == y.len()
                    && x.iter()
                        .zip(y)
                        .all(|(&xa, &ya)| self.deep_eq(xa, other, ya))
            }
            _ => false,
        }
    }

    /// Adapter rendering `id` as compact JSON through `Display`.
    pub fn display(&self, id: NodeId) -> NodeDisplay<'_> {
        NodeDisplay { doc: self, id }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

pub struct NodeDisplay<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::encode::to_string(self.doc, self.id))
    }
}
