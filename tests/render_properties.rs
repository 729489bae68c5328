//! Integration tests for the static renderer

use rfsnap::demo::{foo, simple_component, simple_context, Simple};
use rfsnap::{
    component, create_element, fragment, render, render_with, text, Context, Element, Error,
    RenderOptions,
};
use serde_json::json;

fn sample_tree() -> Element {
    create_element(
        "div",
        (),
        vec![
            create_element("div", (), vec![text("foo")]),
            create_element("h1", (), vec![text("test")]),
            create_element("button", (), vec![text("button")]),
        ],
    )
}

#[test]
fn scenario_title_text_is_rendered() {
    let snap = render(&create_element(&foo(), json!({ "title": "test" }), vec![])).unwrap();
    assert!(snap.text().contains("test"));
    assert_eq!(snap.text(), "footestbutton");
}

#[test]
fn scenario_missing_title_still_renders_div() {
    let snap = render(&create_element(&foo(), json!({}), vec![])).expect("missing prop must not fail");
    assert!(snap.markup().contains("div"));
    assert!(snap.markup().contains("<h1></h1>"));
    assert!(!snap.text().contains("test"));
}

#[test]
fn scenario_context_default_is_read() {
    let ctx = simple_context();
    let snap = render(&create_element(&simple_component(&ctx), (), vec![])).unwrap();
    assert!(snap.markup().contains("foo"));
    assert_eq!(snap.html(), "<div>foo</div>");
}

#[test]
fn intrinsic_tags_appear_in_document_order() {
    let snap = render(&sample_tree()).unwrap();
    let markup = snap.markup();
    let positions: Vec<usize> = ["<div>", "<div>foo", "<h1>", "<button>"]
        .iter()
        .map(|tag| markup.find(tag).expect("tag present"))
        .collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
}

#[test]
fn every_text_child_is_in_the_text_projection() {
    let snap = render(&sample_tree()).unwrap();
    for t in ["foo", "test", "button"] {
        assert!(snap.text().contains(t), "missing {}", t);
    }
}

#[test]
fn rendering_is_deterministic() {
    let ctx = simple_context();
    let tree = fragment(vec![
        sample_tree(),
        create_element(&simple_component(&ctx), (), vec![]),
        create_element("p", json!({ "b": 1, "a": "x", "style": { "zIndex": 2, "color": "red" } }), vec![]),
    ]);
    let opts = RenderOptions::new().with_context(&ctx, Simple { name: "same".into() });
    let a = render_with(&tree, &opts).unwrap();
    let b = render_with(&tree, &opts).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.digest(), b.digest());
}

#[test]
fn context_override_precedence() {
    let slot = Context::new("D".to_string());
    let s = slot.clone();
    let reader = component("Reader", move |_props, scope| text(scope.use_context(&s)));
    let tree = create_element(&reader, (), vec![]);

    let with_override = render_with(&tree, &RenderOptions::new().with_context(&slot, "V".to_string())).unwrap();
    assert_eq!(with_override.text(), "V");

    let without = render(&tree).unwrap();
    assert_eq!(without.text(), "D");
}

#[test]
fn override_does_not_leak_into_later_renders() {
    let ctx = simple_context();
    let tree = create_element(&simple_component(&ctx), (), vec![]);
    let opts = RenderOptions::new().with_context(&ctx, Simple { name: "scoped".into() });
    assert!(render_with(&tree, &opts).unwrap().text().contains("scoped"));
    assert_eq!(render(&tree).unwrap().text(), "foo");
}

#[test]
fn nearest_provider_wins_over_render_override() {
    let ctx = simple_context();
    let tree = ctx.provide(
        Simple { name: "provided".into() },
        vec![create_element(&simple_component(&ctx), (), vec![])],
    );
    let opts = RenderOptions::new().with_context(&ctx, Simple { name: "override".into() });
    assert_eq!(render_with(&tree, &opts).unwrap().text(), "provided");
}

#[test]
fn malformed_props_are_construction_errors() {
    let tree = create_element(&foo(), json!(["not", "a", "map"]), vec![]);
    match render(&tree) {
        Err(Error::ConstructionError(msg)) => assert!(msg.contains("Foo")),
        other => panic!("expected construction error, got {:?}", other),
    }
}

#[test]
fn input_tree_is_reusable_after_render() {
    let tree = sample_tree();
    let first = render(&tree).unwrap();
    let second = render(&tree).unwrap();
    assert_eq!(first.markup(), second.markup());
    assert_eq!(tree.tag(), Some("div"));
}

#[cfg(feature = "query")]
#[test]
fn snapshot_queries_find_substructure() {
    let snap = render(&create_element(&foo(), json!({ "title": "test" }), vec![])).unwrap();
    assert_eq!(snap.find("h1").unwrap(), vec!["<h1>test</h1>".to_string()]);
    assert_eq!(snap.find_text("button").unwrap(), vec!["button".to_string()]);
    assert_eq!(snap.find("div").unwrap().len(), 2);
}
