//! Area-matching offset solver on small convex polygons.
//!
//! Purpose
//! - Given the fluid-accessible region (a convex 3-, 4-, or 5-gon), a target
//!   interface normal and a target sub-area, find the offset α such that the
//!   half-plane `n·x <= α` clips the region to exactly that area, and the
//!   clipping chord's endpoints.
//!
//! Method
//! - Rotate the region so the normal points up; order vertices cyclically by
//!   polar angle around the centroid, and by height. The area below a
//!   horizontal line is then piecewise quadratic in height with breakpoints
//!   at vertex heights (bands). Integrate chord widths once to get the band
//!   thresholds, locate the target's band, and invert the quadratic there.
//! - Bottom band: the wedge area is a perfect square in height, solved by
//!   `sqrt`. Interior bands: `ysolve`, with a linear bypass when the two
//!   bounding chords are equal within `eps_band` (degenerate trapezoid).
//!   Targets within `eps_band` of a threshold snap to that vertex height.

use crate::geom::{icx, rotate, rotation_to_up, yk, ysolve, GeomCfg, Polygon, Segment, Vec2};

/// Result of the area match: the offset and the clip chord.
#[derive(Clone, Copy, Debug)]
pub struct NgonCut {
    pub alpha: f64,
    pub facet: Segment,
}

const MAXV: usize = 5;

#[derive(Clone, Copy, Default)]
struct Band {
    lo: f64,
    hi: f64,
    // Bounding edges, as vertex pairs in the rotated frame.
    left: (Vec2, Vec2),
    right: (Vec2, Vec2),
}

impl Band {
    #[inline]
    fn chord(&self, y: f64) -> (f64, f64) {
        let xl = icx(self.left.0, self.left.1, y);
        let xr = icx(self.right.0, self.right.1, y);
        (xl, xr)
    }
}

/// Solve for the offset cutting `poly` (convex, 3 to 5 vertices, any vertex
/// order) to fluid area `target` below the line with normal `nc`.
pub fn area_match(target: f64, poly: &Polygon, nc: Vec2, cfg: &GeomCfg) -> NgonCut {
    let n = poly.len().min(MAXV);
    debug_assert!(n >= 3);
    let (cosr, sinr) = rotation_to_up(nc);

    // Rotated vertices in cyclic order (polar angle around the centroid).
    let mut ring = [Vec2::zeros(); MAXV];
    for i in 0..n {
        ring[i] = rotate(poly[i], cosr, sinr);
    }
    let mut o = Vec2::zeros();
    for v in &ring[..n] {
        o += v;
    }
    o /= n as f64;
    let mut ang = [0.0f64; MAXV];
    for i in 0..n {
        ang[i] = (ring[i].y - o.y).atan2(ring[i].x - o.x);
    }
    for i in 1..n {
        let mut j = i;
        while j > 0 && ang[j - 1] > ang[j] {
            ang.swap(j - 1, j);
            ring.swap(j - 1, j);
            j -= 1;
        }
    }

    // Height-ordered copy, bottom shifted to zero.
    let mut sp = ring;
    for i in 1..n {
        let mut j = i;
        while j > 0 && sp[j - 1].y > sp[j].y {
            sp.swap(j - 1, j);
            j -= 1;
        }
    }
    let shift = sp[0].y;
    for v in &mut ring[..n] {
        v.y -= shift;
    }
    for v in &mut sp[..n] {
        v.y -= shift;
    }

    // Bands between consecutive distinct heights, with their bounding edges.
    let mut bands = [Band::default(); MAXV - 1];
    let mut nb = 0;
    for i in 0..n - 1 {
        let (lo, hi) = (sp[i].y, sp[i + 1].y);
        if hi - lo <= 0.0 {
            continue;
        }
        let mid = (lo + hi) / 2.0;
        let mut left = (Vec2::zeros(), Vec2::zeros());
        let mut right = left;
        let (mut xl, mut xr) = (f64::INFINITY, f64::NEG_INFINITY);
        for e in 0..n {
            let (a, b) = (ring[e], ring[(e + 1) % n]);
            if (b.y - a.y).abs() <= cfg.eps_tiny
                || mid < a.y.min(b.y)
                || mid > a.y.max(b.y)
            {
                continue;
            }
            let x = icx(a, b, mid);
            if x < xl {
                xl = x;
                left = (a, b);
            }
            if x > xr {
                xr = x;
                right = (a, b);
            }
        }
        bands[nb] = Band { lo, hi, left, right };
        nb += 1;
    }
    if nb == 0 {
        // Degenerate region: every vertex at one height.
        let p = rotate(Vec2::new(sp[0].x, sp[0].y + shift), cosr, -sinr);
        return NgonCut {
            alpha: nc.dot(&p),
            facet: Segment { a: p, b: p },
        };
    }
    let bands = &bands[..nb];
    // Band starting at or covering a given height; bias upward so vertex
    // heights use the band above them.
    let band_at = |y: f64| -> &Band {
        for b in bands {
            if y >= b.lo && y < b.hi {
                return b;
            }
        }
        &bands[nb - 1]
    };

    // Chord widths at vertex heights (zero at the extremes by convention;
    // the wedge bands integrate from or to a point).
    let mut w = [0.0f64; MAXV];
    for i in 1..n - 1 {
        let (xl, xr) = band_at(sp[i].y).chord(sp[i].y);
        w[i] = xr - xl;
    }

    // Cumulative area below each vertex height (trapezoid rule is exact for
    // piecewise-linear widths).
    let mut cum = [0.0f64; MAXV];
    for i in 1..n {
        cum[i] = cum[i - 1] + (w[i - 1] + w[i]) * (sp[i].y - sp[i - 1].y) / 2.0;
    }

    let y_sol;
    'solve: {
        // Exact threshold hits snap to the vertex height.
        for i in 1..n {
            if (target - cum[i]).abs() <= cfg.eps_band {
                y_sol = sp[i].y;
                break 'solve;
            }
        }
        // Bottom wedge: area grows with the square of the height.
        if target >= 0.0 && target < cum[1] - cfg.eps_band {
            y_sol = (target * sp[1].y * sp[1].y / cum[1]).max(0.0).sqrt();
            break 'solve;
        }
        for i in 1..n - 1 {
            if target > cum[i] + cfg.eps_band && target < cum[i + 1] - cfg.eps_band {
                let band = band_at(sp[i].y);
                let top_band = i == n - 2;
                if !top_band && (w[i] - w[i + 1]).abs() < cfg.eps_band {
                    // Parallel chords: the quadratic degenerates, interpolate.
                    y_sol = sp[i].y
                        + (target - cum[i]) * (sp[i + 1].y - sp[i].y) / (cum[i + 1] - cum[i]);
                } else {
                    let kl = yk(band.left.0, band.left.1);
                    let kr = yk(band.right.0, band.right.1);
                    let a = (kr - kl) / 2.0;
                    let t = ysolve(a, w[i], -(target - cum[i]), sp[i].y, sp[i + 1].y);
                    y_sol = sp[i].y + t;
                }
                break 'solve;
            }
        }
        // At or above the total: the chord collapses onto the top vertex.
        y_sol = sp[n - 1].y;
    }

    // Chord endpoints at the solved height, back in the unrotated frame.
    let (p0, p1) = if y_sol >= sp[n - 1].y {
        (sp[n - 1], sp[n - 1])
    } else {
        let (xl, xr) = band_at(y_sol).chord(y_sol);
        (Vec2::new(xl, y_sol), Vec2::new(xr, y_sol))
    };
    let a = rotate(Vec2::new(p0.x, p0.y + shift), cosr, -sinr);
    let b = rotate(Vec2::new(p1.x, p1.y + shift), cosr, -sinr);

    NgonCut {
        alpha: nc.dot(&a),
        facet: Segment { a, b },
    }
}
