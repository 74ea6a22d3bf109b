// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_responsive` resolution and `understory_breakpoints` lookups.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::cell::Cell;
use std::rc::Rc;

use understory_breakpoints::{BreakpointRegistry, LayoutConfig};
use understory_media::{MatchMedia, MockMediaEnvironment, PrintHook};
use understory_responsive::MediaMarshaller;

const KEYS: [&str; 4] = ["layout", "layout-align", "flex", "show"];
const ALIASES: [&str; 4] = ["", "xs", "gt-sm", "lg"];

struct World {
    env: MockMediaEnvironment,
    marshal: MediaMarshaller<u32>,
    elements: Vec<Rc<u32>>,
    calls: Rc<Cell<u64>>,
}

fn world(config: &LayoutConfig, count: u32) -> World {
    let registry = Rc::new(BreakpointRegistry::from_config(config));
    let env = MockMediaEnvironment::with_registry(registry.clone());
    env.set_use_overlaps(true);
    let engine = MatchMedia::new(Rc::new(env.clone()), config);
    let hook = Rc::new(PrintHook::new(registry.clone(), config));
    let marshal = MediaMarshaller::new(engine, registry, hook);
    let calls = Rc::new(Cell::new(0_u64));

    let elements: Vec<Rc<u32>> = (0..count).map(Rc::new).collect();
    for el in &elements {
        for key in KEYS {
            let (on_update, on_clear) = (calls.clone(), calls.clone());
            marshal.init(
                el,
                key,
                move |_| on_update.set(on_update.get() + 1),
                move || on_clear.set(on_clear.get() + 1),
                &[],
            );
            for (i, alias) in ALIASES.iter().enumerate() {
                marshal.set_value(el, key, format!("{key}-{i}"), alias);
            }
        }
    }
    World {
        env,
        marshal,
        elements,
        calls,
    }
}

fn bench_resolve(c: &mut Criterion) {
    let config = LayoutConfig::default();

    let mut group = c.benchmark_group("responsive/resolve");

    group.bench_function("get_value/winning", |b| {
        let w = world(&config, 1);
        w.env.activate("md");
        let el = &w.elements[0];
        b.iter(|| black_box(w.marshal.get_value(el, "layout", None)));
    });

    group.bench_function("get_value/exact", |b| {
        let w = world(&config, 1);
        let el = &w.elements[0];
        b.iter(|| black_box(w.marshal.get_value(el, "flex", Some("gt-sm"))));
    });

    group.bench_function("set_value", |b| {
        let w = world(&config, 1);
        w.env.activate("sm");
        let el = &w.elements[0];
        b.iter(|| w.marshal.set_value(el, "layout", black_box("column"), "xs"));
    });

    for count in [16_u32, 256] {
        group.bench_function(BenchmarkId::new("update_styles", count), |b| {
            let w = world(&config, count);
            w.env.activate("lg");
            b.iter(|| w.marshal.update_styles());
            black_box(w.calls.get());
        });

        group.bench_function(BenchmarkId::new("activate", count), |b| {
            let w = world(&config, count);
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                w.env.activate(if flip { "xs" } else { "lg" });
            });
            black_box(w.calls.get());
        });
    }

    group.finish();

    let mut group = c.benchmark_group("breakpoints/lookup");
    let registry =
        BreakpointRegistry::from_config(&LayoutConfig::default().with_orientation_breakpoints(true));
    let query = registry
        .find_by_alias("gt-md")
        .map(|bp| bp.media_query.clone())
        .unwrap_or_default();

    group.bench_function("by_alias", |b| {
        b.iter(|| black_box(registry.find_by_alias(black_box("handset.portrait"))));
    });
    group.bench_function("by_query", |b| {
        b.iter(|| black_box(registry.find_by_query(black_box(&query))));
    });
    group.bench_function("from_config", |b| {
        let config = LayoutConfig::default().with_orientation_breakpoints(true);
        b.iter(|| black_box(BreakpointRegistry::from_config(&config)));
    });

    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
