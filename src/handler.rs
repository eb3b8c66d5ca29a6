use std::fmt;
use std::sync::Arc;

use crate::page::PageRecord;

/// Whatever produces a response for a matched path. Invocation semantics
/// live outside this crate; the resolver only routes to one.
///
/// `page_handler` is the flat-page factory indirection: an application view
/// mounted above a stored page may manufacture a handler bound to that
/// page's record. Views that do not serve pages keep the default.
pub trait Handler: Send + Sync + fmt::Debug {
    fn page_handler(&self, _page: &PageRecord) -> Option<Arc<dyn Handler>> {
        None
    }
}
