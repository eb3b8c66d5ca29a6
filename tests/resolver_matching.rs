use std::sync::Arc;

use canopy_router::resolver::resolve_in;
use canopy_router::{
    ContentRouter, Handler, NotFoundReason, Resolution, Route, RouteEntry, RouteTree,
    StaticPageProvider, UrlArgs,
};

#[derive(Debug)]
struct View(&'static str);
impl Handler for View {}

fn entry(template: &str, name: &'static str) -> RouteEntry {
    RouteEntry::new(template, Arc::new(View(name)))
}

fn no_pages() -> Arc<StaticPageProvider> {
    Arc::new(StaticPageProvider::default())
}

#[test]
fn resolve_when_nested_path_given_then_handler_and_variables_returned() {
    let router = ContentRouter::new(
        vec![
            entry("/", "root"),
            entry("/blog/", "blog"),
            entry("/blog/<slug>/", "blog_slug"),
        ],
        no_pages(),
    )
    .expect("router should build");

    match router.resolve("/blog/hello-world/") {
        Resolution::Match(found) => {
            assert_eq!(found.url_args.get("slug").map(String::as_str), Some("hello-world"));
            assert!(format!("{:?}", found.handler).contains("blog_slug"));
        }
        other => panic!("expected a match, got {other:?}"),
    }
}

#[test]
fn resolve_when_built_url_resolved_then_original_handler_and_args_return() {
    let slug_handler: Arc<dyn Handler> = Arc::new(View("blog_slug"));
    let router = ContentRouter::new(
        vec![
            entry("/", "root"),
            entry("/blog/", "blog"),
            RouteEntry::new("/blog/<slug>/", slug_handler.clone()),
        ],
        no_pages(),
    )
    .expect("router should build");

    let route = Route::parse("/blog/<slug>/").expect("route should parse");
    let mut args = UrlArgs::new();
    args.insert("slug".to_string(), "round-trip".to_string());
    let built = route.build(&args).expect("build should succeed");
    assert_eq!(built, "/blog/round-trip/");

    match router.resolve(&built) {
        Resolution::Match(found) => {
            assert!(Arc::ptr_eq(&found.handler, &slug_handler));
            assert_eq!(found.url_args, args);
        }
        other => panic!("expected a match, got {other:?}"),
    }
}

#[test]
fn resolve_when_trailing_slash_missing_then_redirect_is_suggested() {
    let router = ContentRouter::new(vec![entry("/blog/<slug>/", "blog_slug")], no_pages())
        .expect("router should build");

    match router.resolve("/blog/hello-world") {
        Resolution::NotFound {
            suggested_redirect,
            reason,
        } => {
            assert_eq!(suggested_redirect.as_deref(), Some("/blog/hello-world/"));
            assert_eq!(reason, NotFoundReason::NoMatch);
        }
        other => panic!("expected not-found with suggestion, got {other:?}"),
    }
}

#[test]
fn resolve_when_slash_variant_also_misses_then_no_redirect_is_suggested() {
    let router = ContentRouter::new(vec![entry("/blog/<slug>/", "blog_slug")], no_pages())
        .expect("router should build");

    match router.resolve("/shop/item") {
        Resolution::NotFound {
            suggested_redirect, ..
        } => assert!(suggested_redirect.is_none()),
        other => panic!("expected not-found, got {other:?}"),
    }
}

#[test]
fn resolve_when_siblings_overlap_then_first_declared_wins() {
    let first: Arc<dyn Handler> = Arc::new(View("first"));
    let second: Arc<dyn Handler> = Arc::new(View("second"));
    let router = ContentRouter::new(
        vec![
            entry("/", "root"),
            RouteEntry::new("/x/<a>/", first.clone()),
            RouteEntry::new("/x/<b>/", second.clone()),
        ],
        no_pages(),
    );
    // both siblings occupy distinct pattern paths but match the same
    // remainders; declaration order decides
    let router = router.expect("router should build");
    match router.resolve("/x/anything/") {
        Resolution::Match(found) => assert!(Arc::ptr_eq(&found.handler, &first)),
        other => panic!("expected a match, got {other:?}"),
    }
}

#[test]
fn resolve_when_resolution_fails_then_best_partial_never_regresses() {
    let tree = RouteTree::build(vec![
        entry("/", "root"),
        entry("/blog/", "blog"),
        entry("/blog/<slug>/", "blog_slug"),
        entry("/shop/", "shop"),
    ])
    .expect("tree should build");

    let miss = resolve_in(&tree, "/blog/post/extra/tail/").expect_err("should not match");
    let best = miss.best.expect("partial match should be kept");
    // the deepest consumer is /blog/<slug>/, leaving "extra/tail/"
    assert_eq!(tree.node(best.node).path(), "/blog/<slug>/");
    assert_eq!(best.unmatched_len, "extra/tail/".len());

    // a shallower failure in another branch must not replace it
    let shallow = resolve_in(&tree, "/shop/deep/er/").expect_err("should not match");
    let shallow_best = shallow.best.expect("partial match should be kept");
    assert_eq!(tree.node(shallow_best.node).path(), "/shop/");
}

#[test]
fn resolve_when_constraint_rejects_segment_then_sibling_is_tried() {
    let numeric: Arc<dyn Handler> = Arc::new(View("numeric"));
    let general: Arc<dyn Handler> = Arc::new(View("general"));
    let router = ContentRouter::new(
        vec![
            entry("/", "root"),
            RouteEntry::new("/item/<id:[0-9]+>/", numeric.clone()),
            RouteEntry::new("/item/<name>/", general.clone()),
        ],
        no_pages(),
    )
    .expect("router should build");

    match router.resolve("/item/42/") {
        Resolution::Match(found) => assert!(Arc::ptr_eq(&found.handler, &numeric)),
        other => panic!("expected a match, got {other:?}"),
    }
    match router.resolve("/item/widget/") {
        Resolution::Match(found) => assert!(Arc::ptr_eq(&found.handler, &general)),
        other => panic!("expected a match, got {other:?}"),
    }
}

#[test]
fn resolve_when_path_is_hostile_then_not_found_without_panic() {
    let router = ContentRouter::new(vec![entry("/", "root")], no_pages())
        .expect("router should build");

    assert!(!router.resolve("/../etc/passwd").is_match());
    assert!(!router.resolve("relative/path/").is_match());
    assert!(!router.resolve("/bad\tbyte/").is_match());
}

#[test]
fn resolve_when_segment_is_multibyte_then_literal_miss_is_not_found() {
    let router = ContentRouter::new(vec![entry("/", "root"), entry("/a/", "a")], no_pages())
        .expect("router should build");

    // 'é' is two bytes; comparing it against the one-byte literal must
    // miss cleanly instead of slicing mid-character
    assert!(!router.resolve("/é/").is_match());
    assert!(!router.resolve("/café/news/").is_match());
    assert!(router.resolve("/a/").is_match());
}

#[test]
fn resolve_when_match_returned_then_node_key_reaches_the_merged_view() {
    let router = ContentRouter::new(
        vec![
            entry("/", "root"),
            entry("/blog/", "blog"),
            entry("/blog/<slug>/", "blog_slug"),
        ],
        no_pages(),
    )
    .expect("router should build");

    let tree = router.current();
    match tree.resolve("/blog/hello-world/") {
        Resolution::Match(found) => {
            let node = tree.node(found.node).expect("key should address the resolved node");
            assert_eq!(node.path(), "/blog/<slug>/");
            let parent = node.parent().expect("parent should exist");
            assert_eq!(parent.path(), "/blog/");
            assert_eq!(found.url_args.get("slug").map(String::as_str), Some("hello-world"));
        }
        other => panic!("expected a match, got {other:?}"),
    }
}
