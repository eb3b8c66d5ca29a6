use std::sync::{Arc, OnceLock};

use smallvec::SmallVec;

use crate::handler::Handler;
use crate::page::PageRecord;
use crate::route::Route;
use crate::types::NodeId;

/// What a node resolves to: a registered view handler, or a stored page
/// whose handler is manufactured on first access.
#[derive(Debug)]
pub enum HandlerSlot {
    View(Arc<dyn Handler>),
    Deferred(DeferredPage),
}

/// Lazy flat-page binding. `ancestors` holds the view handlers of the
/// page's application ancestors, nearest first; the first one willing to
/// manufacture a handler wins, and the result is cached.
#[derive(Debug)]
pub struct DeferredPage {
    pub record: PageRecord,
    pub(crate) ancestors: SmallVec<[Arc<dyn Handler>; 2]>,
    cell: OnceLock<Arc<dyn Handler>>,
}

impl DeferredPage {
    pub(crate) fn new(record: PageRecord, ancestors: SmallVec<[Arc<dyn Handler>; 2]>) -> Self {
        Self {
            record,
            ancestors,
            cell: OnceLock::new(),
        }
    }

    pub fn materialize(&self) -> Option<Arc<dyn Handler>> {
        if let Some(handler) = self.cell.get() {
            return Some(handler.clone());
        }
        for factory in &self.ancestors {
            if let Some(made) = factory.page_handler(&self.record) {
                // a concurrent caller may have won the race; either value
                // came from the same factory walk
                let _ = self.cell.set(made.clone());
                return Some(made);
            }
        }
        None
    }

    pub fn is_materialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// One entry in a resolution tree. Nodes are created together during a
/// single construction pass and never mutated afterwards; the parent link
/// is assigned exactly once, at attach time.
#[derive(Debug)]
pub struct RouteNode {
    pub(crate) slot: HandlerSlot,
    route: Route,
    rel_route: Route,
    parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    pub(crate) page: Option<PageRecord>,
}

impl RouteNode {
    pub(crate) fn new(
        slot: HandlerSlot,
        route: Route,
        rel_route: Route,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            slot,
            route,
            rel_route,
            parent,
            children: SmallVec::new(),
            page: None,
        }
    }

    /// The node's absolute route.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// The route relative to the parent; equal to the absolute route for
    /// forest roots. This is what the resolver matches against the
    /// remainder handed down from above.
    pub fn relative_route(&self) -> &Route {
        &self.rel_route
    }

    pub fn path(&self) -> &str {
        self.route.path_key()
    }

    pub fn level(&self) -> usize {
        self.route.level()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The registered view handler, if this node has one (deferred page
    /// nodes do not until materialized).
    pub fn view_handler(&self) -> Option<&Arc<dyn Handler>> {
        match &self.slot {
            HandlerSlot::View(handler) => Some(handler),
            HandlerSlot::Deferred(_) => None,
        }
    }

    /// The deferred page slot, if this node is a lazy flat-page binding.
    pub fn deferred(&self) -> Option<&DeferredPage> {
        match &self.slot {
            HandlerSlot::Deferred(deferred) => Some(deferred),
            HandlerSlot::View(_) => None,
        }
    }

    /// The page record associated with this node: the deferred record for
    /// page nodes, or metadata merged onto a view node whose path collides
    /// with a stored page.
    pub fn page_record(&self) -> Option<&PageRecord> {
        match &self.slot {
            HandlerSlot::Deferred(deferred) => Some(&deferred.record),
            HandlerSlot::View(_) => self.page.as_ref(),
        }
    }
}
