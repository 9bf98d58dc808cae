//! Criterion benchmarks for the area-matching solver on random cell polygons.
//! Focus sizes: n in {3, 4, 5} vertices.
//! Results land under target/criterion by default.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use mofrec::geom::rand::{draw_direction, draw_ngon, NgonCfg, ReplayToken};
use mofrec::geom::{GeomCfg, Line, Polygon, Vec2};
use mofrec::reconstruct::{area_match, polygon_alpha};

fn fixtures(n: usize, count: u64) -> Vec<(Polygon, Vec2)> {
    (0..count)
        .map(|idx| {
            let poly = draw_ngon(
                NgonCfg {
                    vertices: n,
                    scale: Vec2::new(1.0, 0.7),
                    ..NgonCfg::default()
                },
                ReplayToken { seed: 11, index: idx },
            );
            let nc = draw_direction(ReplayToken { seed: 12, index: idx });
            (poly, nc)
        })
        .collect()
}

fn bench_area_match(c: &mut Criterion) {
    let cfg = GeomCfg::default();
    let mut group = c.benchmark_group("area_match");
    for &n in &[3usize, 4, 5] {
        group.bench_with_input(BenchmarkId::new("ngon", n), &n, |b, &n| {
            b.iter_batched(
                || fixtures(n, 64),
                |fx| {
                    for (poly, nc) in &fx {
                        let _cut = area_match(0.2, poly, *nc, &cfg);
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_polygon_alpha(c: &mut Criterion) {
    let cfg = GeomCfg::default();
    let mut group = c.benchmark_group("polygon_alpha");
    for &deg in &[30u32, 90, 150] {
        group.bench_with_input(BenchmarkId::new("cut_cell", deg), &deg, |b, &deg| {
            let th = f64::from(deg).to_radians();
            let solid = Line::new(Vec2::new(th.sin(), -th.cos()), 0.1);
            b.iter_batched(
                || {
                    (0..64u64)
                        .map(|idx| draw_direction(ReplayToken { seed: 13, index: idx }))
                        .collect::<Vec<_>>()
                },
                |ncs| {
                    for nc in &ncs {
                        let _rec = polygon_alpha(0.3, *nc, solid, &cfg);
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_area_match, bench_polygon_alpha);
criterion_main!(benches);
