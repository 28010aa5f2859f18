//! Benchmarks for tracing and graph export
//!
//! Exercises the tracer on wide, densely connected package sets to make
//! sure large environments trace and export in well under a second.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reqgraph::analysis::analyze_conflicts;
use reqgraph::export::{export_to_string, ExportFormat};
use reqgraph::graph::DependencyGraph;
use reqgraph::parser::{Package, ResolvedSet};
use reqgraph::trace::trace;

/// Create a resolved set where every package requires the next `fan_out` packages,
/// wrapping around so the graph is full of cycles.
fn create_resolved_set(total: usize, fan_out: usize) -> ResolvedSet {
    let packages = (0..total)
        .map(|i| {
            let requires: Vec<String> = (1..=fan_out)
                .map(|offset| format!("pkg-{}>=1.0", (i + offset) % total))
                .collect();
            Package::new(format!("pkg-{}", i), Some("1.0.0"), requires)
        })
        .collect();

    ResolvedSet::from_packages(packages).expect("generated names are unique")
}

/// Benchmark a full trace from every root
fn bench_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace");

    for size in [100, 1000, 5000, 10000].iter() {
        let resolved = create_resolved_set(*size, 5);
        let roots = resolved.roots();

        group.bench_with_input(BenchmarkId::new("packages", size), size, |b, _| {
            b.iter(|| black_box(trace(&roots, &resolved)));
        });
    }

    group.finish();
}

/// Benchmark conflict analysis and graph construction over a traced edge list
fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for size in [1000, 5000].iter() {
        let resolved = create_resolved_set(*size, 5);
        let roots = resolved.roots();
        let traced = trace(&roots, &resolved);

        group.bench_with_input(BenchmarkId::new("conflicts", size), &traced.edges, |b, edges| {
            b.iter(|| black_box(analyze_conflicts(edges)));
        });

        group.bench_with_input(BenchmarkId::new("graph", size), &traced.edges, |b, edges| {
            b.iter(|| black_box(DependencyGraph::from_edges(edges)));
        });
    }

    group.finish();
}

/// Benchmark JSON and DOT serialization
fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    let resolved = create_resolved_set(2000, 5);
    let roots = resolved.roots();
    let traced = trace(&roots, &resolved);
    let graph = DependencyGraph::from_edges(&traced.edges);

    for format in [ExportFormat::Json, ExportFormat::Dot, ExportFormat::Dump] {
        group.bench_function(format.to_string(), |b| {
            b.iter(|| black_box(export_to_string(format, &graph)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_trace, bench_analyze, bench_export);
criterion_main!(benches);
