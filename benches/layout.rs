// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mermaid_canvas::format::mermaid::{parse_flowchart, parse_sequence};
use mermaid_canvas::layout::{auto_layout, compute_layout, LayeredLayout, LayoutOptions};

mod config;
mod fixtures;

fn benches_layout(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("layout.sequence");
        for case in fixtures::seq::Case::ALL {
            let ast = parse_sequence(&fixtures::seq::fixture(case)).expect("parse_sequence");
            group.throughput(Throughput::Elements(ast.events().len() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| {
                    let layout = compute_layout(black_box(&ast));
                    black_box(layout.height())
                })
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("layout.flowchart_layered");
        for case in fixtures::flow::Case::ALL {
            let ast = parse_flowchart(&fixtures::flow::fixture(case)).expect("parse_flowchart");
            let options = LayoutOptions::for_direction(ast.direction());
            group.throughput(Throughput::Elements(ast.nodes().len() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| {
                    let positions = auto_layout(black_box(&ast), &LayeredLayout, &options)
                        .expect("auto_layout");
                    black_box(positions.len())
                })
            });
        }
        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = config::criterion();
    targets = benches_layout
}
criterion_main!(benches);
