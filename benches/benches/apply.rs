// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_styler` style building and application.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use understory_styler::{
    InlineStyle, StyleCache, StyleMap, StyleUtils, StylesheetMap, VirtualElement, build_cached,
};

fn layout(input: &str, _: Option<&dyn Any>) -> StyleMap {
    let mut parts = input.split_whitespace();
    let direction = parts.next().unwrap_or("row");
    let wrap = parts.next().unwrap_or("nowrap");
    StyleMap::new()
        .with("-webkit-flex-direction", direction)
        .with("flex-direction", direction)
        .with("flex-wrap", wrap)
        .with_values("display", ["flex", "-webkit-box", "-ms-flexbox"])
        .with("box-sizing", "border-box")
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("styler/build");

    group.bench_function("uncached", |b| {
        b.iter(|| black_box(layout(black_box("column wrap"), None)));
    });

    group.bench_function("cached", |b| {
        let cache = RefCell::new(StyleCache::new());
        b.iter(|| black_box(build_cached(&layout, &cache, black_box("column wrap"), None)));
    });

    group.finish();

    let mut group = c.benchmark_group("styler/apply");
    let styles = layout("column wrap", None);

    group.bench_function("browser", |b| {
        let utils = StyleUtils::browser();
        let el = Rc::new(VirtualElement::new());
        b.iter(|| utils.apply_style_to_element(&el, black_box(&styles)));
    });

    group.bench_function("server_stylesheet", |b| {
        let sheet: Rc<StylesheetMap<VirtualElement>> = Rc::new(StylesheetMap::new());
        let utils = StyleUtils::server_with_stylesheet(sheet);
        let el = Rc::new(VirtualElement::new());
        b.iter(|| utils.apply_style_to_element(&el, black_box(&styles)));
    });

    group.bench_function("server_attribute", |b| {
        let utils = StyleUtils::server();
        b.iter_batched(
            || Rc::new(VirtualElement::new()),
            |el| {
                let result = utils.apply_style_to_element(&el, &styles);
                black_box((result, el));
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();

    let mut group = c.benchmark_group("styler/inline");
    let text = "display: flex; flex-direction: column; flex-wrap: wrap; box-sizing: border-box";
    group.bench_function("parse", |b| {
        b.iter(|| black_box(InlineStyle::parse(black_box(text))));
    });
    group.finish();
}

criterion_group!(benches, bench_apply);
criterion_main!(benches);
