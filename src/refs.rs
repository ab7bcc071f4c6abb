use smallvec::SmallVec;

use crate::document::{Document, NodeData, NodeId};

const REF_KEY: &str = "$ref";

type Segments<'a> = SmallVec<[&'a str; 8]>;

impl Document {
    /// One-hop dereference: the target of a resolved reference, otherwise
    /// `id` itself. Never fails and never chains.
    pub fn resolve(&self, id: NodeId) -> NodeId {
        match &self.node(id).data {
            NodeData::Reference {
                target: Some(target),
                ..
            } => *target,
            _ => id,
        }
    }

    /// Walks `segments` as object member names starting from `id`. An empty
    /// path resolves `id` itself; a `#` segment restarts the walk at the
    /// root of the tree the current node belongs to. Any step through a
    /// non-object or a missing key is `None`. Array elements cannot be
    /// addressed this way.
    pub fn lookup_path(&self, id: NodeId, segments: &[&str]) -> Option<NodeId> {
        let Some((first, rest)) = segments.split_first() else {
            return Some(self.resolve(id));
        };
        if *first == "#" {
            return self.lookup_path(self.root_of(id), rest);
        }
        match &self.node(id).data {
            NodeData::Object(map) => {
                let child = map.get(*first).copied()?;
                self.lookup_path(child, rest)
            }
            _ => None,
        }
    }

    /// Rewrites every object below `root` that carries a string `$ref`
    /// member into a reference node, resolving its slash-separated path
    /// against `root`. A path that does not lead anywhere still rewrites,
    /// with an empty target. Reference nodes themselves are not descended
    /// into, so an already-resolved document is a fixed point.
    pub fn resolve_refs(&mut self, root: NodeId) {
        self.resolve_refs_under(root, root);
    }

    fn resolve_refs_under(&mut self, id: NodeId, root: NodeId) {
        let children: SmallVec<[NodeId; 16]> = match &self.node(id).data {
            NodeData::Object(map) => map.values().copied().collect(),
            NodeData::Array(items) => items.iter().copied().collect(),
            _ => return,
        };
        for child in children {
            if let Some(path) = self.reference_path(child) {
                let target = {
                    let segments: Segments<'_> = path.split('/').collect();
                    self.lookup_path(root, &segments)
                };
                if target.is_none() {
                    log::debug!("unresolved reference path '{path}'");
                }
                self.node_mut(child).data = NodeData::Reference { path, target };
            } else {
                self.resolve_refs_under(child, root);
            }
        }
    }

    fn reference_path(&self, id: NodeId) -> Option<String> {
        let NodeData::Object(map) = &self.node(id).data else {
            return None;
        };
        let ref_id = map.get(REF_KEY).copied()?;
        match &self.node(ref_id).data {
            NodeData::String(path) => Some(path.clone()),
            _ => None,
        }
    }
}
