use criterion::{criterion_group, criterion_main, Criterion};

use rfsnap::demo::{foo, simple_component, simple_context, Simple};
use rfsnap::{create_element, render, render_with, text, Element, RenderOptions};
use serde_json::json;

fn wide_tree(n: usize) -> Element {
    let rows = (0..n)
        .map(|i| create_element("li", json!({ "className": "row", "data-i": i }), vec![text(format!("item {}", i))]))
        .collect::<Vec<_>>();
    create_element("ul", (), rows)
}

fn bench_render_component(c: &mut Criterion) {
    let tree = create_element(&foo(), json!({ "title": "bench" }), vec![]);
    c.bench_function("render_foo", |b| {
        b.iter(|| {
            let _ = render(&tree).unwrap();
        })
    });
}

fn bench_render_wide(c: &mut Criterion) {
    let tree = wide_tree(1000);
    c.bench_function("render_1000_rows", |b| {
        b.iter(|| {
            let _ = render(&tree).unwrap();
        })
    });
}

fn bench_render_context(c: &mut Criterion) {
    let ctx = simple_context();
    let tree = create_element(&simple_component(&ctx), (), vec![]);
    let opts = RenderOptions::new().with_context(&ctx, Simple { name: "bench".into() });
    c.bench_function("render_with_context", |b| {
        b.iter(|| {
            let _ = render_with(&tree, &opts).unwrap();
        })
    });
}

criterion_group!(benches, bench_render_component, bench_render_wide, bench_render_context);
criterion_main!(benches);
