//! Recursive path matching against one route tree.
//!
//! Each node consumes a prefix of the path via its relative route and hands
//! the remainder to its children in declaration order; the first child to
//! fully consume the path wins. Failures thread the best partial match seen
//! anywhere in the recursion back up, so the caller can turn a near-miss
//! into a redirect suggestion instead of a bare not-found.

use crate::tree::RouteTree;
use crate::types::{CapturedArgs, NodeId};

/// The longest-consuming failed match retained during a failed resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialMatch {
    pub node: NodeId,
    /// Bytes of path left unconsumed when the match stalled; smaller is a
    /// longer, more useful match.
    pub unmatched_len: usize,
}

/// A failed resolution, carrying the best partial match if any node
/// consumed part of the path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoMatch {
    pub best: Option<PartialMatch>,
}

impl NoMatch {
    fn miss() -> Self {
        Self { best: None }
    }

    /// Keeps whichever of the two failures got further into the path.
    /// Never regresses to a shorter match than one already recorded.
    fn absorb(&mut self, other: NoMatch) {
        match (&self.best, other.best) {
            (_, None) => {}
            (None, Some(candidate)) => self.best = Some(candidate),
            (Some(current), Some(candidate)) => {
                if candidate.unmatched_len < current.unmatched_len {
                    self.best = Some(candidate);
                }
            }
        }
    }
}

/// Walks the tree's roots in declaration order, returning the first node
/// that fully consumes `path` together with its accumulated captures.
#[tracing::instrument(level = "trace", skip(tree), fields(path = %path))]
pub fn resolve_in(tree: &RouteTree, path: &str) -> Result<(NodeId, CapturedArgs), NoMatch> {
    let mut args = CapturedArgs::new();
    let mut failure = NoMatch::miss();
    for &root in tree.roots() {
        match resolve_node(tree, root, path, &mut args) {
            Ok(id) => return Ok((id, args)),
            Err(miss) => failure.absorb(miss),
        }
    }
    Err(failure)
}

fn resolve_node(
    tree: &RouteTree,
    id: NodeId,
    input: &str,
    args: &mut CapturedArgs,
) -> Result<NodeId, NoMatch> {
    let node = tree.node(id);
    let checkpoint = args.len();

    let remainder = match node.relative_route().match_into(input, args) {
        Some(remainder) => remainder,
        None => return Err(NoMatch::miss()),
    };

    if remainder.is_empty() {
        return Ok(id);
    }

    // this node consumed something; it is itself a partial-match candidate
    let mut failure = NoMatch {
        best: Some(PartialMatch {
            node: id,
            unmatched_len: remainder.len(),
        }),
    };

    for &child in node.children() {
        match resolve_node(tree, child, remainder, args) {
            Ok(hit) => return Ok(hit),
            Err(miss) => failure.absorb(miss),
        }
    }

    args.truncate(checkpoint);
    Err(failure)
}
