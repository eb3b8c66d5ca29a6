use crate::multi::MultiTree;
use crate::page::PageRecord;
use crate::path::strip_last_segment;
use crate::route::Route;
use crate::tree::RouteNode;
use crate::types::NodeId;

/// A node viewed through the composed resolution surface rather than its
/// owning tree. Parent and child navigation cross tree boundaries, so a
/// stored-page tree and a view tree read as one hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct MergedNode<'t> {
    multi: &'t MultiTree,
    tree_idx: usize,
    node_id: NodeId,
}

impl<'t> MergedNode<'t> {
    pub(crate) fn new(multi: &'t MultiTree, tree_idx: usize, node_id: NodeId) -> Self {
        Self {
            multi,
            tree_idx,
            node_id,
        }
    }

    fn node(&self) -> &'t RouteNode {
        self.multi.trees[self.tree_idx].node(self.node_id)
    }

    pub fn path(&self) -> &'t str {
        self.node().path()
    }

    pub fn route(&self) -> &'t Route {
        self.node().route()
    }

    pub fn level(&self) -> usize {
        self.node().level()
    }

    pub fn page_record(&self) -> Option<&'t PageRecord> {
        self.node().page_record()
    }

    /// Index of the member tree that owns the underlying node.
    pub fn owning_tree(&self) -> usize {
        self.tree_idx
    }

    /// The parent within the owning tree when it has one; otherwise the
    /// nearest ancestor path found in any member tree, peeling one segment
    /// at a time.
    pub fn parent(&self) -> Option<MergedNode<'t>> {
        if let Some(parent_id) = self.node().parent() {
            return Some(MergedNode::new(self.multi, self.tree_idx, parent_id));
        }
        let mut candidate = strip_last_segment(self.path());
        while let Some(path) = candidate {
            if let Some(found) = self.multi.node_at(&path) {
                return Some(found);
            }
            candidate = strip_last_segment(&path);
        }
        None
    }

    /// Children drawn from every member tree, deduplicated by path in
    /// favor of the earlier-declared tree. A tree owning a node at this
    /// path contributes that node's own children; a tree that only has
    /// descendants here contributes its next-level nodes under this
    /// path prefix.
    pub fn children(&self) -> Vec<MergedNode<'t>> {
        let mut out: Vec<MergedNode<'t>> = Vec::new();
        let mut seen: Vec<&str> = Vec::new();
        let path = self.path();
        let next_level = self.level() + 1;
        for (tree_idx, tree) in self.multi.trees.iter().enumerate() {
            let mut push = |child_id: NodeId, child_path: &'t str| {
                if !seen.contains(&child_path) {
                    seen.push(child_path);
                    out.push(MergedNode::new(self.multi, tree_idx, child_id));
                }
            };
            match tree.node_at(path) {
                Some((_, node)) => {
                    for &child_id in node.children() {
                        push(child_id, tree.node(child_id).path());
                    }
                }
                None => {
                    for (child_id, node) in tree.nodes.iter().enumerate() {
                        if node.level() == next_level && node.path().starts_with(path) {
                            push(child_id, node.path());
                        }
                    }
                }
            }
        }
        out
    }
}
