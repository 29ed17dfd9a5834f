// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mermaid_canvas::format::mermaid::{
    generate_flowchart, generate_sequence, parse_flowchart, parse_markup, parse_sequence,
};

mod config;
mod fixtures;

// Group and case ids stay stable so results remain comparable across refactors.
fn benches_parse(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("format.parse_flowchart");
        for case in fixtures::flow::Case::ALL {
            let mmd = fixtures::flow::fixture(case);
            group.throughput(Throughput::Bytes(mmd.len() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| {
                    let parsed = parse_flowchart(black_box(&mmd)).expect("parse_flowchart");
                    black_box(fixtures::checksum_flowchart(black_box(&parsed)))
                })
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("format.parse_sequence");
        for case in fixtures::seq::Case::ALL {
            let mmd = fixtures::seq::fixture(case);
            group.throughput(Throughput::Bytes(mmd.len() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| {
                    let parsed = parse_sequence(black_box(&mmd)).expect("parse_sequence");
                    black_box(fixtures::checksum_sequence(black_box(&parsed)))
                })
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("format.dispatch");
        let mmd = fixtures::seq::fixture(fixtures::seq::Case::Medium);
        group.bench_function("medium_sequence", move |b| {
            b.iter(|| black_box(parse_markup(black_box(&mmd)).expect("parse_markup")))
        });
        group.finish();
    }
}

fn benches_generate(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("format.generate_flowchart");
        for case in fixtures::flow::Case::ALL {
            let ast = parse_flowchart(&fixtures::flow::fixture(case)).expect("parse_flowchart");
            group.throughput(Throughput::Elements(ast.edges().len() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| black_box(generate_flowchart(black_box(&ast))).len())
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("format.generate_sequence");
        for case in fixtures::seq::Case::ALL {
            let ast = parse_sequence(&fixtures::seq::fixture(case)).expect("parse_sequence");
            group.throughput(Throughput::Elements(ast.events().len() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| black_box(generate_sequence(black_box(&ast))).len())
            });
        }
        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = config::criterion();
    targets = benches_parse, benches_generate
}
criterion_main!(benches);
