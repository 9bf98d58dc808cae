//! Scalar helpers for the band solver and polygon areas.

use super::types::{GeomError, Vec2};

/// x-coordinate of the chord a→b at height `y`.
#[inline]
pub fn icx(a: Vec2, b: Vec2, y: f64) -> f64 {
    a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y)
}

/// Reciprocal slope dx/dy of the chord a→b.
///
/// The guard tests |Δx| while the division is by Δy, and near-vertical-in-x
/// chords collapse to 0. The band solver's quadratic coefficients and sign
/// selection are tuned to exactly this behavior; do not symmetrize.
#[inline]
pub fn yk(a: Vec2, b: Vec2) -> f64 {
    if (a.x - b.x).abs() > 1e-10 {
        (a.x - b.x) / (a.y - b.y)
    } else {
        0.0
    }
}

/// Root of `a·y² + b·y + c = 0` lying within the band height `[0, max - min]`.
///
/// Both roots are evaluated; the first is returned when it is in range, the
/// second otherwise (the band construction guarantees one of them is).
#[inline]
pub fn ysolve(a: f64, b: f64, c: f64, min: f64, max: f64) -> f64 {
    let disc = (b * b - 4.0 * a * c).sqrt();
    let y1 = (-b + disc) / (2.0 * a);
    let y2 = (-b - disc) / (2.0 * a);
    if y1 >= 0.0 && y1 <= max - min {
        y1
    } else {
        y2
    }
}

/// (cos, sin) of the rotation taking `n` onto the +y axis.
///
/// The sine sign follows the 2D cross product of `n` with +y, so the rotation
/// is always the shorter one.
#[inline]
pub fn rotation_to_up(n: Vec2) -> (f64, f64) {
    let cos = (n.y / n.norm()).clamp(-1.0, 1.0);
    let sin = (1.0 - cos * cos).max(0.0).sqrt();
    if n.x > 0.0 {
        (cos, sin)
    } else {
        (cos, -sin)
    }
}

/// Applies the rotation (cos, sin) to `p`. Pass `(cos, -sin)` to invert.
#[inline]
pub fn rotate(p: Vec2, cos: f64, sin: f64) -> Vec2 {
    Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
}

/// Area of the polygon spanned by `pts` (at most 6), sorted by polar angle
/// around the centroid before the shoelace pass.
///
/// Input order does not matter; the result is the area of the convex
/// traversal, positive. Errors when no vertex is given.
pub fn polygon_area(pts: &[Vec2]) -> Result<f64, GeomError> {
    if pts.is_empty() {
        return Err(GeomError::EmptyPolygon);
    }
    let n = pts.len().min(6);
    let mut v = [Vec2::zeros(); 6];
    v[..n].copy_from_slice(&pts[..n]);

    let mut o = Vec2::zeros();
    for p in &v[..n] {
        o += p;
    }
    o /= n as f64;

    let mut ang = [0.0f64; 6];
    for (k, p) in v[..n].iter().enumerate() {
        ang[k] = (p.y - o.y).atan2(p.x - o.x);
    }
    for i in 1..n {
        let mut j = i;
        while j > 0 && ang[j - 1] > ang[j] {
            ang.swap(j - 1, j);
            v.swap(j - 1, j);
            j -= 1;
        }
    }

    let mut area = 0.0;
    for i in 0..n {
        let b = (i + n - 1) % n;
        let f = (i + 1) % n;
        area += v[i].x * (v[f].y - v[b].y) / 2.0;
    }
    Ok(area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icx_interpolates_linearly() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(2.0, 4.0);
        assert!((icx(a, b, 1.0) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn yk_guard_is_on_dx_but_division_on_dy() {
        let a = Vec2::new(0.0, 1.0);
        let b = Vec2::new(1.0, 3.0);
        assert!((yk(a, b) - 0.5).abs() < 1e-15);
        // |Δx| below the guard: collapses to zero even though Δy is large.
        let c = Vec2::new(1e-11, 7.0);
        let d = Vec2::new(0.0, 1.0);
        assert_eq!(yk(c, d), 0.0);
        // |Δx| above the guard with tiny Δy: huge value, not a divide guard.
        let e = Vec2::new(1.0, 1e-3);
        let f = Vec2::new(0.0, 0.0);
        assert!((yk(e, f) - 1e3).abs() < 1e-6);
    }

    #[test]
    fn ysolve_picks_the_in_band_root() {
        // (y - 1)(y - 10) = y² - 11y + 10, band height 2 → root 1.
        let y = ysolve(1.0, -11.0, 10.0, 0.0, 2.0);
        assert!((y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_aligns_normal_with_up() {
        for n in [
            Vec2::new(1.0, 0.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(0.3, -0.8),
            Vec2::new(-0.2, 0.9),
        ] {
            let (c, s) = rotation_to_up(n);
            let r = rotate(n, c, s);
            assert!(r.x.abs() < 1e-12, "n={n:?} r={r:?}");
            assert!(r.y > 0.0);
            let back = rotate(r, c, -s);
            assert!((back - n).norm() < 1e-12);
        }
    }

    #[test]
    fn polygon_area_is_order_independent() {
        let sq = [
            Vec2::new(0.5, 0.5),
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(-0.5, 0.5),
        ];
        assert!((polygon_area(&sq).unwrap() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn polygon_area_rejects_empty_input() {
        assert_eq!(polygon_area(&[]), Err(GeomError::EmptyPolygon));
    }
}
