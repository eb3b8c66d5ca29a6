use std::sync::Arc;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::handler::Handler;
use crate::path::{level_of, strip_last_segment};
use crate::route::Route;
use crate::tree::{HandlerSlot, RouteNode, RouteTree, TreeError, TreeResult};
use crate::types::NodeId;

/// A declarative registration: one path template bound to one handler.
/// Trees are built from a plain list of these; hierarchy is never declared,
/// only inferred from the paths themselves.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub template: String,
    pub handler: Arc<dyn Handler>,
}

impl RouteEntry {
    pub fn new(template: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        Self {
            template: template.into(),
            handler,
        }
    }
}

impl RouteTree {
    /// Builds a non-recombining tree from an unordered entry list.
    ///
    /// Parent edges are inferred by peeling trailing segments off each
    /// path and looking the result up among already-placed nodes. Input
    /// order is preserved among nodes of equal depth, so registration
    /// order is sibling order.
    #[tracing::instrument(level = "debug", skip(entries))]
    pub fn build(entries: impl IntoIterator<Item = RouteEntry>) -> TreeResult<Self> {
        let mut slotted = Vec::new();
        for entry in entries {
            let route = Route::parse(&entry.template)?;
            slotted.push((route, HandlerSlot::View(entry.handler)));
        }
        Self::build_from_slots(slotted)
    }

    pub(crate) fn build_from_slots(
        mut slotted: Vec<(Route, HandlerSlot)>,
    ) -> TreeResult<Self> {
        if slotted.is_empty() {
            return Err(TreeError::NoRoutes);
        }

        // stable: declaration order survives among equal levels
        slotted.sort_by_key(|(route, _)| route.level());

        let mut tree = RouteTree {
            nodes: Vec::with_capacity(slotted.len()),
            roots: SmallVec::new(),
            by_path: HashMap::with_capacity(slotted.len()),
            root_level: 0,
        };

        for (route, slot) in slotted {
            let key = route.path_key().to_string();
            if tree.by_path.contains_key(key.as_str()) {
                return Err(TreeError::DuplicatePath { path: key });
            }

            if tree.nodes.is_empty() {
                // first node establishes the root-level baseline
                tree.root_level = route.level();
                tree.attach_root(key, route, slot);
                continue;
            }
            if route.level() == tree.root_level {
                tree.attach_root(key, route, slot);
                continue;
            }

            let parent = tree.find_parent(&key)?;
            match parent {
                Some(parent_id) => tree.attach_child(key, route, slot, parent_id)?,
                None => tree.attach_root(key, route, slot),
            }
        }

        tracing::debug!(
            nodes = tree.nodes.len(),
            roots = tree.roots.len(),
            root_level = tree.root_level,
            "route tree built"
        );
        Ok(tree)
    }

    /// Peels trailing segments off `key` until an already-placed node is
    /// found, or until the candidate drops below the root-level baseline
    /// (the node then becomes a root-level peer).
    fn find_parent(&self, key: &str) -> TreeResult<Option<NodeId>> {
        let mut candidate = match strip_last_segment(key) {
            Some(candidate) => candidate,
            None => {
                return Err(TreeError::UnresolvableAncestor {
                    path: key.to_string(),
                });
            }
        };
        loop {
            if let Some(&parent_id) = self.by_path.get(candidate.as_str()) {
                return Ok(Some(parent_id));
            }
            if level_of(&candidate) < self.root_level {
                return Ok(None);
            }
            candidate = match strip_last_segment(&candidate) {
                Some(next) => next,
                None => {
                    return Err(TreeError::UnresolvableAncestor {
                        path: key.to_string(),
                    });
                }
            };
        }
    }

    fn attach_root(&mut self, key: String, route: Route, slot: HandlerSlot) {
        let rel = route.clone();
        let id = self.nodes.len();
        self.nodes.push(RouteNode::new(slot, route, rel, None));
        self.roots.push(id);
        self.by_path.insert(key.into_boxed_str(), id);
    }

    fn attach_child(
        &mut self,
        key: String,
        route: Route,
        slot: HandlerSlot,
        parent_id: NodeId,
    ) -> TreeResult<()> {
        let parent_key = self.nodes[parent_id].path();
        // the resolver's remainder convention has no leading slash, so the
        // relative template must not keep one either
        let rel_template = key
            .strip_prefix(parent_key)
            .map(|rel| rel.strip_prefix('/').unwrap_or(rel));
        let rel_template = match rel_template {
            Some(rel) if !rel.is_empty() => rel,
            _ => {
                return Err(TreeError::UnresolvableAncestor { path: key });
            }
        };
        let rel = Route::parse_relative(rel_template)?;

        let id = self.nodes.len();
        self.nodes
            .push(RouteNode::new(slot, route, rel, Some(parent_id)));
        self.nodes[parent_id].children.push(id);
        self.by_path.insert(key.into_boxed_str(), id);
        Ok(())
    }
}
