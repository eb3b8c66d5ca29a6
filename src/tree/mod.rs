mod build;
mod error;
mod node;

pub use build::RouteEntry;
pub use error::{TreeError, TreeResult};
pub use node::{DeferredPage, HandlerSlot, RouteNode};

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::page::PageRecord;
use crate::types::NodeId;

/// A forest of route nodes built from a flat entry list, with parent/child
/// edges inferred purely from path-prefix containment. Immutable once
/// built; concurrent lookups need no locking.
#[derive(Debug)]
pub struct RouteTree {
    pub(crate) nodes: Vec<RouteNode>,
    pub(crate) roots: SmallVec<[NodeId; 4]>,
    pub(crate) by_path: HashMap<Box<str>, NodeId>,
    pub(crate) root_level: usize,
}

impl RouteTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &RouteNode {
        &self.nodes[id]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Depth of the shallowest registered route.
    pub fn root_level(&self) -> usize {
        self.root_level
    }

    /// Exact-path lookup against the tree's path index.
    pub fn node_at(&self, path: &str) -> Option<(NodeId, &RouteNode)> {
        let id = *self.by_path.get(path)?;
        Some((id, &self.nodes[id]))
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    /// Depth-first walk over the whole forest in declaration order. Each
    /// call walks the immutable tree fresh; the iterator is restartable by
    /// calling `iter` again.
    pub fn iter(&self) -> TreeIter<'_> {
        let mut stack: Vec<NodeId> = Vec::with_capacity(self.nodes.len().min(16));
        stack.extend(self.roots.iter().rev());
        TreeIter { tree: self, stack }
    }

    pub(crate) fn attach_page(&mut self, id: NodeId, record: PageRecord) {
        self.nodes[id].page = Some(record);
    }
}

pub struct TreeIter<'t> {
    tree: &'t RouteTree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for TreeIter<'t> {
    type Item = (NodeId, &'t RouteNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id];
        self.stack.extend(node.children().iter().rev());
        Some((id, node))
    }
}
