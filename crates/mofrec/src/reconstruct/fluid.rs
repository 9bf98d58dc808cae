//! Fluid interface normal estimators.
//!
//! Two estimators, tried in order:
//! - column-sum height slopes on the dominant axis (radius 2), accurate when
//!   the interface crosses all three columns cleanly;
//! - the mixed Youngs-centered (MYC) estimate from the radius-1 patch as the
//!   general fallback.
//!
//! Both return normals pointing out of the fluid with the fluid on the side
//! `n·x <= alpha`. MYC output is L1-normalized, height output L2-normalized;
//! every consumer is scale-consistent so the mix is harmless.

use super::stencil::{Axis, Stencil3, Stencil5};
use crate::geom::{GeomCfg, Vec2};

/// Mixed Youngs-centered normal from a 3×3 fraction patch.
///
/// Builds the centered-column estimate and the Youngs 9-point estimate, each
/// normalized so its dominant component is ±1, then keeps the candidate with
/// the flatter minor slope. Meaningful only where the center fraction is
/// mixed.
pub fn mycs(c: &Stencil3) -> Vec2 {
    // Column/row sums around the center.
    let c_t = c.at(-1, 1) + c.at(0, 1) + c.at(1, 1);
    let c_b = c.at(-1, -1) + c.at(0, -1) + c.at(1, -1);
    let c_r = c.at(1, -1) + c.at(1, 0) + c.at(1, 1);
    let c_l = c.at(-1, -1) + c.at(-1, 0) + c.at(-1, 1);

    // Centered candidate, dominant component snapped to ±1.
    let mut mx0 = 0.5 * (c_l - c_r);
    let mut my0 = 0.5 * (c_b - c_t);
    if mx0.abs() <= my0.abs() {
        my0 = if my0 > 0.0 { 1.0 } else { -1.0 };
    } else {
        mx0 = if mx0 > 0.0 { 1.0 } else { -1.0 };
    }

    // Youngs candidate, same normalization.
    let mm1 = c.at(-1, -1) + 2.0 * c.at(-1, 0) + c.at(-1, 1);
    let mm2 = c.at(1, -1) + 2.0 * c.at(1, 0) + c.at(1, 1);
    let mut mx1 = 0.5 * (mm1 - mm2);
    let mm1 = c.at(-1, -1) + 2.0 * c.at(0, -1) + c.at(1, -1);
    let mm2 = c.at(-1, 1) + 2.0 * c.at(0, 1) + c.at(1, 1);
    let mut my1 = 0.5 * (mm1 - mm2);
    if mx1.abs() > my1.abs() {
        let mm = mx1.abs() + 1e-30;
        mx1 = if mx1 > 0.0 { 1.0 } else { -1.0 };
        my1 /= mm;
    } else {
        let mm = my1.abs() + 1e-30;
        my1 = if my1 > 0.0 { 1.0 } else { -1.0 };
        mx1 /= mm;
    }

    // Smaller L1 norm means a flatter minor slope: keep that candidate.
    let (mx, my) = if mx0.abs() + my0.abs() < mx1.abs() + my1.abs() {
        (mx0, my0)
    } else {
        (mx1, my1)
    };
    let nn = mx.abs() + my.abs();
    Vec2::new(mx / nn, my / nn)
}

/// Height-function normal from 5-cell column sums, or `None` when the
/// interface is not cleanly resolved by the three columns.
///
/// The dominant axis is picked from centered differences; a column is usable
/// when its far cells are pure (one full, one empty within `eps_vol`) with
/// the same orientation across all three columns.
pub fn height_normal(c: &Stencil5, cfg: &GeomCfg) -> Option<Vec2> {
    let inner = c.inner();
    let gx = inner.at(-1, 0) - inner.at(1, 0);
    let gy = inner.at(0, -1) - inner.at(0, 1);
    // Height measured along the dominant direction.
    let axis = if gy.abs() >= gx.abs() { Axis::Y } else { Axis::X };

    // Orientation: +1 when the fluid sits on the negative side of the axis.
    let mut ori = 0i32;
    let mut h = [0.0f64; 3];
    for (k, i) in (-1..=1).enumerate() {
        let lo = c.along(axis.other(), i, -2);
        let hi = c.along(axis.other(), i, 2);
        let o = if lo >= 1.0 - cfg.eps_vol && hi <= cfg.eps_vol {
            1
        } else if hi >= 1.0 - cfg.eps_vol && lo <= cfg.eps_vol {
            -1
        } else {
            return None;
        };
        if k == 0 {
            ori = o;
        } else if o != ori {
            return None;
        }
        for j in -2..=2 {
            h[k] += c.along(axis.other(), i, j);
        }
    }
    if h[1] <= 0.0 || h[1] >= 5.0 {
        return None;
    }

    // Fluid below: outward normal ∝ (-h'(x), 1); fluid above mirrors both.
    let slope = (h[0] - h[2]) / 2.0;
    let n = Vec2::new(ori as f64 * slope, ori as f64);
    let n = n / n.norm();
    Some(match axis {
        Axis::Y => n,
        Axis::X => Vec2::new(n.y, n.x),
    })
}

/// Best available fluid normal: height function first, MYC fallback.
/// `None` where the center fraction is not mixed.
pub fn interface_normal(c: &Stencil5, cfg: &GeomCfg) -> Option<Vec2> {
    let cc = c.at(0, 0);
    if cc <= 0.0 || cc >= 1.0 {
        return None;
    }
    Some(height_normal(c, cfg).unwrap_or_else(|| mycs(&c.inner())))
}

/// MYC-only variant of [`interface_normal`], used where the extended field
/// is rebuilt without heights.
pub fn myc_normal(c: &Stencil3) -> Option<Vec2> {
    let cc = c.center();
    if cc <= 0.0 || cc >= 1.0 {
        return None;
    }
    Some(mycs(c))
}
