pub mod handler;
pub mod multi;
pub mod page;
pub mod path;
pub mod resolver;
pub mod route;
pub mod tree;
pub mod types;

pub use handler::Handler;
pub use multi::{
    ContentTree, MergedNode, MultiTree, NodeKey, NotFoundReason, Resolution, RouteMatch,
};
pub use page::{PageProvider, PageRecord, StaticPageProvider};
pub use route::{Route, RouteError};
pub use tree::{RouteEntry, RouteTree, TreeError, TreeResult};
pub use types::UrlArgs;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::path::NormalizeOptions;

/// The published resolution surface: an immutable [`ContentTree`] behind an
/// atomically swappable reference.
///
/// Trees are built in full, then published; `rebuild` constructs a fresh
/// tree from the current registrations and page records and swaps it in.
/// Readers resolve against whichever tree was published when they started
/// and never observe a half-built one. A failed rebuild leaves the old
/// tree published.
#[derive(Debug)]
pub struct ContentRouter {
    views: Vec<RouteEntry>,
    provider: Arc<dyn PageProvider>,
    options: NormalizeOptions,
    published: RwLock<Arc<ContentTree>>,
}

impl ContentRouter {
    pub fn new(views: Vec<RouteEntry>, provider: Arc<dyn PageProvider>) -> TreeResult<Self> {
        Self::with_options(views, provider, NormalizeOptions::default())
    }

    pub fn with_options(
        views: Vec<RouteEntry>,
        provider: Arc<dyn PageProvider>,
        options: NormalizeOptions,
    ) -> TreeResult<Self> {
        let tree = ContentTree::build(views.iter().cloned(), provider.as_ref())?;
        Ok(Self {
            views,
            provider,
            options,
            published: RwLock::new(Arc::new(tree)),
        })
    }

    /// The currently published tree. The returned handle stays valid across
    /// rebuilds; it just stops being the published one.
    pub fn current(&self) -> Arc<ContentTree> {
        self.published.read().clone()
    }

    /// Discards the published tree and rebuilds from the current view
    /// registrations and page records. On error the old tree remains
    /// published and the error is returned for the operator.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn rebuild(&self) -> TreeResult<()> {
        let tree = ContentTree::build(self.views.iter().cloned(), self.provider.as_ref())?;
        *self.published.write() = Arc::new(tree);
        tracing::debug!("content tree rebuilt and published");
        Ok(())
    }

    /// Resolves a request path, applying the trailing-slash recovery
    /// policy: if the path fails as given but succeeds with a trailing
    /// slash appended, the outcome is NotFound with a redirect suggestion
    /// rather than a bare miss.
    pub fn resolve(&self, path: &str) -> Resolution {
        let normalized = match path::normalize_path(path, &self.options) {
            Ok(normalized) => normalized,
            Err(error) => {
                tracing::debug!(path, %error, "path rejected before resolution");
                return Resolution::NotFound {
                    suggested_redirect: None,
                    reason: NotFoundReason::NoMatch,
                };
            }
        };

        let tree = self.current();
        match tree.resolve(&normalized) {
            Resolution::Match(found) => Resolution::Match(found),
            Resolution::NotFound {
                suggested_redirect,
                reason,
            } => {
                if reason == NotFoundReason::NoMatch && !normalized.ends_with('/') {
                    let retried = path::ensure_trailing_slash(&normalized);
                    if tree.resolve(&retried).is_match() {
                        return Resolution::NotFound {
                            suggested_redirect: Some(retried),
                            reason,
                        };
                    }
                }
                Resolution::NotFound {
                    suggested_redirect,
                    reason,
                }
            }
        }
    }
}
