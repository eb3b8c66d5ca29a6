use std::sync::Arc;

use smallvec::SmallVec;

use crate::handler::Handler;
use crate::multi::{MergedNode, MultiTree, NodeKey, Resolution};
use crate::page::PageProvider;
use crate::path::strip_last_segment;
use crate::route::Route;
use crate::tree::{DeferredPage, HandlerSlot, RouteEntry, RouteTree, TreeError, TreeResult};

/// The CMS composition: a tree of statically registered application views
/// merged with a tree of stored flat pages.
///
/// A page path that collides with a view keeps the view's handler and
/// carries the record as metadata; a page-only path gets a deferred slot
/// whose handler is manufactured by the nearest ancestor view on first
/// access. The view tree is declared first, so it wins both resolution
/// phases on any overlap.
#[derive(Debug)]
pub struct ContentTree {
    multi: MultiTree,
}

impl ContentTree {
    #[tracing::instrument(level = "debug", skip(views, provider))]
    pub fn build(
        views: impl IntoIterator<Item = RouteEntry>,
        provider: &dyn PageProvider,
    ) -> TreeResult<Self> {
        let mut view_tree = RouteTree::build(views)?;

        let mut page_slots: Vec<(Route, HandlerSlot)> = Vec::new();
        for record in provider.all_records() {
            let route = Route::parse(&record.path)?;
            let key = route.path_key().to_string();
            if let Some((id, _)) = view_tree.node_at(&key) {
                tracing::debug!(path = %key, "page record merged onto view node as metadata");
                view_tree.attach_page(id, record);
                continue;
            }
            let ancestors = ancestor_factories(&view_tree, &key)?;
            page_slots.push((
                route,
                HandlerSlot::Deferred(DeferredPage::new(record, ancestors)),
            ));
        }

        let mut trees = vec![view_tree];
        if !page_slots.is_empty() {
            trees.push(RouteTree::build_from_slots(page_slots)?);
        }
        Ok(Self {
            multi: MultiTree::new(trees)?,
        })
    }

    pub fn resolve(&self, path: &str) -> Resolution {
        self.multi.resolve(path)
    }

    pub fn node_at(&self, path: &str) -> Option<MergedNode<'_>> {
        self.multi.node_at(path)
    }

    /// The uniform node view for a key carried out of a resolution against
    /// this tree.
    pub fn node(&self, key: NodeKey) -> Option<MergedNode<'_>> {
        self.multi.node(key)
    }

    pub fn multi(&self) -> &MultiTree {
        &self.multi
    }

    /// The statically registered view tree (always the first member).
    pub fn view_tree(&self) -> &RouteTree {
        &self.multi.trees[0]
    }

    /// The stored-page tree, absent when every record collided with a view.
    pub fn page_tree(&self) -> Option<&RouteTree> {
        self.multi.trees.get(1)
    }
}

/// Collects the view handlers of every application node above `key`,
/// nearest first. A page with no view above it can never materialize a
/// handler, which makes the whole tree unpublishable.
fn ancestor_factories(
    view_tree: &RouteTree,
    key: &str,
) -> TreeResult<SmallVec<[Arc<dyn Handler>; 2]>> {
    let mut out: SmallVec<[Arc<dyn Handler>; 2]> = SmallVec::new();
    let mut candidate = strip_last_segment(key);
    while let Some(path) = candidate {
        if let Some((_, node)) = view_tree.node_at(&path)
            && let Some(handler) = node.view_handler()
        {
            out.push(handler.clone());
        }
        candidate = strip_last_segment(&path);
    }
    if out.is_empty() {
        return Err(TreeError::NoAncestorApplication {
            path: key.to_string(),
        });
    }
    Ok(out)
}
