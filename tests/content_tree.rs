use std::sync::Arc;

use canopy_router::{
    ContentRouter, ContentTree, Handler, NotFoundReason, PageRecord, Resolution, RouteEntry,
    StaticPageProvider, TreeError,
};
use serde_json::json;

/// An application view that manufactures handlers for stored pages below
/// its mount point.
#[derive(Debug)]
struct AppView(&'static str);

impl Handler for AppView {
    fn page_handler(&self, page: &PageRecord) -> Option<Arc<dyn Handler>> {
        Some(Arc::new(PageView {
            path: page.path.clone(),
        }))
    }
}

/// A plain view with no page factory.
#[derive(Debug)]
struct PlainView(&'static str);
impl Handler for PlainView {}

#[derive(Debug)]
struct PageView {
    path: String,
}
impl Handler for PageView {}

fn app(template: &str, name: &'static str) -> RouteEntry {
    RouteEntry::new(template, Arc::new(AppView(name)))
}

fn plain(template: &str, name: &'static str) -> RouteEntry {
    RouteEntry::new(template, Arc::new(PlainView(name)))
}

fn provider(records: Vec<PageRecord>) -> Arc<StaticPageProvider> {
    Arc::new(StaticPageProvider::new(records))
}

#[test]
fn content_when_page_has_no_view_at_its_path_then_handler_is_manufactured() {
    let router = ContentRouter::new(
        vec![app("/", "root")],
        provider(vec![PageRecord::new("/about/", json!({"title": "About"}))]),
    )
    .expect("router should build");

    match router.resolve("/about/") {
        Resolution::Match(found) => {
            let page = found.page.expect("record should be attached");
            assert_eq!(page.path, "/about/");
            assert_eq!(page.data["title"], "About");
            assert!(format!("{:?}", found.handler).contains("PageView"));
            // the key addresses the page node in the merged view
            let tree = router.current();
            let node = tree.node(found.node).expect("key should resolve");
            assert_eq!(node.path(), "/about/");
            assert_eq!(node.owning_tree(), 1);
        }
        other => panic!("expected a match, got {other:?}"),
    }
}

#[test]
fn content_when_page_resolved_twice_then_manufactured_handler_is_cached() {
    let router = ContentRouter::new(
        vec![app("/", "root")],
        provider(vec![PageRecord::new("/about/", json!({}))]),
    )
    .expect("router should build");

    let tree = router.current();
    let (_, about) = tree
        .page_tree()
        .expect("page tree should exist")
        .node_at("/about/")
        .expect("page node should exist");
    let slot = about.deferred().expect("node should be deferred");
    assert!(!slot.is_materialized());

    let first = match router.resolve("/about/") {
        Resolution::Match(found) => found.handler,
        other => panic!("expected a match, got {other:?}"),
    };
    assert!(slot.is_materialized());
    let second = match router.resolve("/about/") {
        Resolution::Match(found) => found.handler,
        other => panic!("expected a match, got {other:?}"),
    };
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn content_when_page_and_view_share_a_path_then_view_wins_with_metadata() {
    let blog_handler: Arc<dyn Handler> = Arc::new(AppView("blog"));
    let router = ContentRouter::new(
        vec![
            app("/", "root"),
            RouteEntry::new("/blog/", blog_handler.clone()),
        ],
        provider(vec![PageRecord::new("/blog/", json!({"title": "Blog"}))]),
    )
    .expect("router should build");

    match router.resolve("/blog/") {
        Resolution::Match(found) => {
            assert!(Arc::ptr_eq(&found.handler, &blog_handler));
            let page = found.page.expect("record should ride along as metadata");
            assert_eq!(page.data["title"], "Blog");
        }
        other => panic!("expected a match, got {other:?}"),
    }
}

#[test]
fn content_when_static_hit_requires_variables_then_failure_is_strict() {
    let router = ContentRouter::new(
        vec![app("/", "root"), plain("/x/<y>/", "xy")],
        provider(Vec::new()),
    )
    .expect("router should build");

    // the literal request collides with the registered pattern path
    match router.resolve("/x/<y>/") {
        Resolution::NotFound {
            reason,
            suggested_redirect,
        } => {
            assert_eq!(reason, NotFoundReason::AmbiguousStaticMatch);
            assert!(suggested_redirect.is_none());
        }
        other => panic!("expected strict not-found, got {other:?}"),
    }
}

#[test]
fn content_when_no_ancestor_manufactures_then_resolution_reports_it() {
    let router = ContentRouter::new(
        vec![plain("/", "root")],
        provider(vec![PageRecord::new("/about/", json!({}))]),
    )
    .expect("router should build");

    match router.resolve("/about/") {
        Resolution::NotFound { reason, .. } => {
            assert_eq!(reason, NotFoundReason::PageHandlerUnavailable);
        }
        other => panic!("expected not-found, got {other:?}"),
    }
}

#[test]
fn content_when_page_has_no_view_ancestor_then_construction_fails() {
    let err = ContentTree::build(
        vec![app("/admin/", "admin")],
        &StaticPageProvider::new(vec![PageRecord::new("/about/", json!({}))]),
    )
    .expect_err("orphan page should fail construction");
    assert!(matches!(err, TreeError::NoAncestorApplication { path } if path == "/about/"));
}

#[test]
fn content_when_nearest_ancestor_declines_then_higher_one_manufactures() {
    // /docs/ has no factory; / does. The page under /docs/ still gets a
    // handler, from the grandparent.
    let router = ContentRouter::new(
        vec![app("/", "root"), plain("/docs/", "docs")],
        provider(vec![PageRecord::new("/docs/faq/", json!({}))]),
    )
    .expect("router should build");

    match router.resolve("/docs/faq/") {
        Resolution::Match(found) => {
            assert!(format!("{:?}", found.handler).contains("PageView"));
        }
        other => panic!("expected a match, got {other:?}"),
    }
}

#[test]
fn merged_when_trees_overlap_then_children_union_both_sources() {
    let tree = ContentTree::build(
        vec![app("/", "root"), plain("/blog/", "blog")],
        &StaticPageProvider::new(vec![
            PageRecord::new("/about/", json!({})),
            PageRecord::new("/blog/news/", json!({})),
        ]),
    )
    .expect("tree should build");

    let root = tree.node_at("/").expect("root should exist");
    let child_paths: Vec<&str> = root.children().iter().map(|child| child.path()).collect();
    assert_eq!(child_paths, vec!["/blog/", "/about/"]);

    let blog = tree.node_at("/blog/").expect("blog should exist");
    let blog_children: Vec<&str> = blog.children().iter().map(|child| child.path()).collect();
    assert_eq!(blog_children, vec!["/blog/news/"]);
}

#[test]
fn merged_when_node_is_a_page_tree_root_then_parent_crosses_trees() {
    let tree = ContentTree::build(
        vec![app("/", "root")],
        &StaticPageProvider::new(vec![PageRecord::new("/about/", json!({}))]),
    )
    .expect("tree should build");

    let about = tree.node_at("/about/").expect("page node should exist");
    assert!(about.page_record().is_some());
    let parent = about.parent().expect("parent should cross into the view tree");
    assert_eq!(parent.path(), "/");
    assert_eq!(parent.owning_tree(), 0);
}

#[test]
fn merged_when_page_nests_under_page_then_parent_stays_in_its_tree() {
    let tree = ContentTree::build(
        vec![app("/", "root")],
        &StaticPageProvider::new(vec![
            PageRecord::new("/about/", json!({})),
            PageRecord::new("/about/team/", json!({})),
        ]),
    )
    .expect("tree should build");

    let team = tree.node_at("/about/team/").expect("nested page should exist");
    let parent = team.parent().expect("parent should exist");
    assert_eq!(parent.path(), "/about/");
    assert_eq!(parent.owning_tree(), 1);
}
