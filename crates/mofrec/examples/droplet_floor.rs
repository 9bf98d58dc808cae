//! Advect a blob of fluid along a half-cut floor and print mass per step.
//!
//! Usage:
//!   cargo run -p mofrec --example droplet_floor -- [steps]
//!
//! The floor cuts the second cell row in half; the blob starts in the left
//! quarter of the channel and is pushed right by a uniform velocity. The
//! printed fluid volume should stay constant to round-off.

use mofrec::prelude::*;

fn main() {
    let steps: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);

    let n = 32usize;
    let g = Grid::new(n, n, 1.0 / n as f64);
    let cfg = GeomCfg::default();

    let open = |j: usize| match j {
        0 => 0.0,
        1 => 0.5,
        _ => 1.0,
    };
    let mut cs = Field::from_fn(n, n, |_, j| open(j));
    let fs = clean_small_cells(&g, &mut cs, 1e-3);
    let c = Field::from_fn(n, n, |i, j| if i < n / 4 { open(j) } else { 0.0 });
    let angle = Field::fill(n, n, 90.0);
    let mut state = TwoPhase::new(g, cs, fs, c, angle);

    let uf = FaceField::from_fns(&g, |_, _| 1.0, |_, _| 0.0);
    let dt = 0.25 * g.delta;

    for step in 0..steps {
        let out = advect(&mut state, &uf, dt, step, &cfg);
        let mass: f64 = state.c.values().iter().sum::<f64>() * g.delta * g.delta;
        let contact = out
            .marks
            .mark
            .values()
            .iter()
            .filter(|&&m| m == CellClass::ContactLine)
            .count();
        println!("step {step:3}: mass={mass:.12} cfl={:.3} contact_cells={contact}", out.max_cfl);
    }
}
