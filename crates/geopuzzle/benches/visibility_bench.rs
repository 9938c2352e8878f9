//! Criterion benchmarks for visibility-graph construction and the departure search.
//! Sizes: number of random axis-aligned blocks in {5, 10, 20, 40}.
//! Results land under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use geopuzzle::api::{build_graph, latest_departure, GeomCfg, Goal, Scene};
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_scene(blocks: usize, seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let obstacles = (0..blocks)
        .map(|_| {
            let x: f64 = rng.gen_range(50.0..900.0);
            let y: f64 = rng.gen_range(0.0..900.0);
            let w: f64 = rng.gen_range(10.0..60.0);
            let h: f64 = rng.gen_range(10.0..60.0);
            vec![
                Vector2::new(x, y),
                Vector2::new(x + w, y),
                Vector2::new(x + w, y + h),
                Vector2::new(x, y + h),
            ]
        })
        .collect();
    Scene::new(
        Vector2::new(1000.0, 100.0),
        Goal::Pursuit { speed: 30.0 / 3.6 },
        obstacles,
        15.0 / 3.6,
    )
}

fn bench_visibility(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility");
    for &m in &[5usize, 10, 20, 40] {
        group.bench_with_input(BenchmarkId::new("build_graph", m), &m, |b, &m| {
            b.iter_batched(
                || random_scene(m, 43),
                |scene| {
                    let _g = build_graph(&scene, GeomCfg::default());
                },
                BatchSize::SmallInput,
            )
        });

        let graph = build_graph(&random_scene(m, 44), GeomCfg::default()).unwrap();
        group.bench_with_input(BenchmarkId::new("latest_departure", m), &m, |b, _| {
            b.iter(|| latest_departure(&graph))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_visibility);
criterion_main!(benches);
