//! Criterion benchmarks for flux clipping and the grid-level passes.
//! Focus sizes: grids of 32², 64², 128² cells.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use mofrec::field::{advect, extended_field, FaceField, Field, Grid, TwoPhase};
use mofrec::geom::rand::{draw_direction, ReplayToken};
use mofrec::geom::{GeomCfg, Line};
use mofrec::reconstruct::{polygon_alpha, polygon_fraction};

/// Half-cut floor row with a fluid column ending mid-domain.
fn channel(n: usize) -> TwoPhase {
    let g = Grid::new(n, n, 1.0 / n as f64);
    let cs = Field::from_fn(n, n, |_, j| match j {
        0 => 0.0,
        1 => 0.5,
        _ => 1.0,
    });
    let fs = FaceField::from_fns(
        &g,
        |_, j| match j {
            0 => 0.0,
            1 => 0.5,
            _ => 1.0,
        },
        |_, j| if j <= 1 { 0.0 } else { 1.0 },
    );
    let c = Field::from_fn(n, n, |i, j| {
        let open = match j {
            0 => 0.0,
            1 => 0.5,
            _ => 1.0,
        };
        if i < n / 2 {
            open
        } else if i == n / 2 {
            0.5 * open
        } else {
            0.0
        }
    });
    let angle = Field::fill(n, n, 90.0);
    TwoPhase::new(g, cs, fs, c, angle)
}

fn bench_polygon_fraction(c: &mut Criterion) {
    let cfg = GeomCfg::default();
    c.bench_function("polygon_fraction/cut_cell", |b| {
        b.iter_batched(
            || {
                (0..64u64)
                    .filter_map(|idx| {
                        let solid = Line::new(draw_direction(ReplayToken { seed: 21, index: idx }), 0.1);
                        let nc = draw_direction(ReplayToken { seed: 22, index: idx });
                        polygon_alpha(0.25, nc, solid, &cfg).map(|rec| (rec, nc))
                    })
                    .collect::<Vec<_>>()
            },
            |fx| {
                for (rec, nc) in &fx {
                    let _a = polygon_fraction(
                        &rec.region,
                        -0.25,
                        -1.0,
                        rec.facet.as_ref(),
                        *nc,
                        rec.alpha,
                        &cfg,
                    );
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_field_passes(c: &mut Criterion) {
    let cfg = GeomCfg::default();
    let mut group = c.benchmark_group("field");
    for &n in &[32usize, 64, 128] {
        group.bench_with_input(BenchmarkId::new("extended_field", n), &n, |b, &n| {
            let state = channel(n);
            b.iter(|| extended_field(&state, &cfg))
        });
        group.bench_with_input(BenchmarkId::new("advect_step", n), &n, |b, &n| {
            let state = channel(n);
            let uf = FaceField::from_fns(&state.grid, |_, _| 1.0, |_, _| 0.0);
            let dt = 0.25 * state.grid.delta;
            b.iter_batched(
                || state.clone(),
                |mut st| advect(&mut st, &uf, dt, 0, &cfg),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_polygon_fraction, bench_field_passes);
criterion_main!(benches);
