//! Criterion benches for the partitioning strategies (group "partition") and
//! the end-to-end processor on lattice graphs (group "process").
//!
//! Results live under `target/criterion`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use territory::api::*;

fn bench_strategies(c: &mut Criterion) {
    let cfg = PartitionCfg::default();
    let mut group = c.benchmark_group("partition");
    group.sample_size(20);
    for side in [8usize, 16] {
        let g = special::grid(side, side, 25.0).expect("grid");
        group.throughput(Throughput::Elements(g.node_count() as u64));
        for s in strategies() {
            group.bench_with_input(
                BenchmarkId::new(s.algorithm.name(), g.node_count()),
                &g,
                |b, g| b.iter(|| (s.run)(black_box(g), &cfg)),
            );
        }
    }
    group.finish();
}

fn bench_process(c: &mut Criterion) {
    let cfg = ProcessCfg::default();
    let g = special::grid(12, 12, 25.0).expect("grid");
    let mut group = c.benchmark_group("process");
    group.sample_size(20);
    for name in ["kernighan_lin", "kmeans", "voronoi"] {
        group.bench_function(name, |b| {
            b.iter(|| process_graph(black_box(&g), 2, name, None, &cfg).expect("process"))
        });
    }
    group.bench_function("silhouette", |b| {
        let p = Partition::halves(g.node_count());
        b.iter(|| evaluate(black_box(&g), &p))
    });
    group.finish();
}

criterion_group!(benches, bench_strategies, bench_process);
criterion_main!(benches);
