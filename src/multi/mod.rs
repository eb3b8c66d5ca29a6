mod content;
mod node_ref;

pub use content::ContentTree;
pub use node_ref::MergedNode;

use std::sync::Arc;

use smallvec::SmallVec;

use crate::handler::Handler;
use crate::page::PageRecord;
use crate::resolver;
use crate::tree::{HandlerSlot, RouteTree, TreeError, TreeResult};
use crate::types::{CapturedArgs, NodeId, UrlArgs};

/// Why a resolution produced no handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// No tree matched the path.
    NoMatch,
    /// The path hit a static entry whose route nonetheless declares
    /// variables; resolved strictly, with no dynamic fallback.
    AmbiguousStaticMatch,
    /// A stored page matched but no ancestor view would manufacture a
    /// handler for it.
    PageHandlerUnavailable,
}

/// Stable address of a node inside a [`MultiTree`]: member-tree index plus
/// arena id. Only meaningful against the tree that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKey {
    pub tree: usize,
    pub node: NodeId,
}

/// A successful resolution: the handler plus everything extracted from the
/// path on the way to it. `node` addresses the resolved node, so callers
/// can re-enter the merged view ([`MultiTree::node`]) and navigate from the
/// match.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub handler: Arc<dyn Handler>,
    pub url_args: UrlArgs,
    pub path: String,
    pub node: NodeKey,
    pub page: Option<PageRecord>,
}

/// Outcome of a resolution. NotFound is an ordinary value, not an error;
/// every unmatched request produces one and callers branch on it.
#[derive(Debug)]
pub enum Resolution {
    Match(RouteMatch),
    NotFound {
        suggested_redirect: Option<String>,
        reason: NotFoundReason,
    },
}

impl Resolution {
    pub fn is_match(&self) -> bool {
        matches!(self, Resolution::Match(_))
    }

    fn not_found(reason: NotFoundReason) -> Self {
        Resolution::NotFound {
            suggested_redirect: None,
            reason,
        }
    }
}

/// N independently-built route trees presented as one resolution surface.
/// Member order is significant: static hits and dynamic matches are both
/// taken from the earliest tree that produces one.
#[derive(Debug)]
pub struct MultiTree {
    pub(crate) trees: SmallVec<[RouteTree; 2]>,
    level: usize,
}

impl MultiTree {
    pub fn new(trees: impl IntoIterator<Item = RouteTree>) -> TreeResult<Self> {
        let trees: SmallVec<[RouteTree; 2]> = trees.into_iter().collect();
        if trees.is_empty() {
            return Err(TreeError::NoRoutes);
        }
        let level = trees
            .iter()
            .map(RouteTree::root_level)
            .min()
            .unwrap_or_default();
        Ok(Self { trees, level })
    }

    /// Depth of the shallowest route across all member trees.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn trees(&self) -> &[RouteTree] {
        &self.trees
    }

    /// Two-phase lookup: exact-path static hits first across all member
    /// trees, then each tree's recursive resolver in declaration order.
    #[tracing::instrument(level = "trace", skip(self), fields(path = %path))]
    pub fn resolve(&self, path: &str) -> Resolution {
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            if let Some((id, node)) = tree.node_at(path) {
                if node.route().has_vars() {
                    // a URL colliding with a known static path must not
                    // silently fall through to pattern matching
                    tracing::debug!(path, "static hit requires variables; failing strictly");
                    return Resolution::not_found(NotFoundReason::AmbiguousStaticMatch);
                }
                return self.finish(tree_idx, id, CapturedArgs::new(), path);
            }
        }

        for (tree_idx, tree) in self.trees.iter().enumerate() {
            if let Ok((id, args)) = resolver::resolve_in(tree, path) {
                return self.finish(tree_idx, id, args, path);
            }
        }

        Resolution::not_found(NotFoundReason::NoMatch)
    }

    /// The uniform node view at an exact path, if any member tree owns it.
    pub fn node_at(&self, path: &str) -> Option<MergedNode<'_>> {
        self.trees.iter().enumerate().find_map(|(tree_idx, tree)| {
            tree.node_at(path)
                .map(|(node_id, _)| MergedNode::new(self, tree_idx, node_id))
        })
    }

    /// The uniform node view for a key carried out of a previous resolution
    /// against this same tree.
    pub fn node(&self, key: NodeKey) -> Option<MergedNode<'_>> {
        let tree = self.trees.get(key.tree)?;
        (key.node < tree.len()).then(|| MergedNode::new(self, key.tree, key.node))
    }

    fn finish(&self, tree_idx: usize, id: NodeId, args: CapturedArgs, path: &str) -> Resolution {
        let node = self.trees[tree_idx].node(id);
        let key = NodeKey {
            tree: tree_idx,
            node: id,
        };
        let url_args: UrlArgs = args.into_iter().collect();
        match &node.slot {
            HandlerSlot::View(handler) => Resolution::Match(RouteMatch {
                handler: handler.clone(),
                url_args,
                path: path.to_string(),
                node: key,
                page: node.page_record().cloned(),
            }),
            HandlerSlot::Deferred(deferred) => match deferred.materialize() {
                Some(handler) => Resolution::Match(RouteMatch {
                    handler,
                    url_args,
                    path: path.to_string(),
                    node: key,
                    page: Some(deferred.record.clone()),
                }),
                None => {
                    tracing::debug!(path, "no ancestor view manufactured a page handler");
                    Resolution::not_found(NotFoundReason::PageHandlerUnavailable)
                }
            },
        }
    }
}
