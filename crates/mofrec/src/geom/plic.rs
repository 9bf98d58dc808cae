//! Piecewise-linear interface calculation on the unit cell.
//!
//! Purpose
//! - Closed-form conversions between a volume fraction and a line offset on
//!   [-1/2, 1/2]², plus the fraction of an arbitrary axis-aligned rectangle
//!   below a line, and facet extraction (line ∩ cell edges).
//!
//! Conventions
//! - Fluid side is `n·x <= alpha`. Offsets are measured from the cell center.
//! - Normals need not be normalized: `line_alpha`/`line_area` are consistent
//!   under joint scaling of `n` and `alpha`.

use super::types::{GeomCfg, Line, Segment, Vec2};

/// Offset `alpha` of the line `n·x = alpha` that cuts the unit cell to the
/// fluid fraction `c` (clamped to [0, 1]).
pub fn line_alpha(c: f64, n: Vec2) -> f64 {
    let c = c.clamp(0.0, 1.0);
    let mut n1 = n.x.abs();
    let mut n2 = n.y.abs();
    if n1 > n2 {
        std::mem::swap(&mut n1, &mut n2);
    }

    let v1 = n1 / 2.0;
    let mut alpha = if c * n2 <= v1 {
        (2.0 * c * n1 * n2).sqrt()
    } else if c * n2 <= n2 - v1 {
        c * n2 + v1
    } else {
        n1 + n2 - (2.0 * n1 * n2 * (1.0 - c)).sqrt()
    };

    if n.x < 0.0 {
        alpha += n.x;
    }
    if n.y < 0.0 {
        alpha += n.y;
    }
    alpha - (n.x + n.y) / 2.0
}

/// Fluid fraction of the unit cell below the line `n·x = alpha` (inverse of
/// [`line_alpha`]).
pub fn line_area(n: Vec2, alpha: f64) -> f64 {
    let mut nx = n.x;
    let mut ny = n.y;
    let mut alpha = alpha + (nx + ny) / 2.0;
    if nx < 0.0 {
        alpha -= nx;
        nx = -nx;
    }
    if ny < 0.0 {
        alpha -= ny;
        ny = -ny;
    }

    if alpha <= 0.0 {
        return 0.0;
    }
    if alpha >= nx + ny {
        return 1.0;
    }

    let area = if nx < 1e-10 {
        alpha / ny
    } else if ny < 1e-10 {
        alpha / nx
    } else {
        let mut v = alpha * alpha;
        let a = alpha - nx;
        if a > 0.0 {
            v -= a * a;
        }
        let a = alpha - ny;
        if a > 0.0 {
            v -= a * a;
        }
        v / (2.0 * nx * ny)
    };
    area.clamp(0.0, 1.0)
}

/// Fluid fraction of the axis-aligned rectangle `[a, b]` (cell-local
/// coordinates) below the line `n·x = alpha`.
///
/// The rectangle is affinely rescaled onto the unit cell and the line is
/// transformed along with it, then [`line_area`] applies.
pub fn rectangle_fraction(n: Vec2, alpha: f64, a: Vec2, b: Vec2) -> f64 {
    let alpha1 = alpha - n.x * (b.x + a.x) / 2.0 - n.y * (b.y + a.y) / 2.0;
    let n1 = Vec2::new(n.x * (b.x - a.x), n.y * (b.y - a.y));
    line_area(n1, alpha1)
}

/// Endpoints of `line` clipped to the unit cell, or `None` when the line
/// crosses fewer than two cell edges.
///
/// Each of the four edges is tested for a crossing within [-1/2, 1/2]; edges
/// nearly parallel to the line (component below `eps_axis`) are skipped. With
/// 3 or 4 raw crossings (the line passes near a corner) the two most widely
/// separated points win.
pub fn unit_square_facet(line: Line, cfg: &GeomCfg) -> Option<Segment> {
    let n = line.n;
    let mut p = [Vec2::zeros(); 4];
    let mut k = 0;
    for s in [-0.5, 0.5] {
        // edge x = s
        if n.y.abs() > cfg.eps_axis {
            let a = (line.alpha - s * n.x) / n.y;
            if a >= -0.5 && a <= 0.5 && k < 4 {
                p[k] = Vec2::new(s, a);
                k += 1;
            }
        }
        // edge y = s
        if n.x.abs() > cfg.eps_axis {
            let a = (line.alpha - s * n.y) / n.x;
            if a >= -0.5 && a <= 0.5 && k < 4 {
                p[k] = Vec2::new(a, s);
                k += 1;
            }
        }
    }

    match k {
        2 => Some(Segment { a: p[0], b: p[1] }),
        3 => {
            let d1 = (p[0] - p[1]).norm();
            let d2 = (p[0] - p[2]).norm();
            Some(Segment {
                a: p[0],
                b: if d1 > d2 { p[1] } else { p[2] },
            })
        }
        4 => {
            // The three distances are measured once, up front; the swap
            // chain below deliberately keeps comparing those stale values.
            let d1 = (p[0] - p[1]).norm();
            let d2 = (p[0] - p[2]).norm();
            let d3 = (p[0] - p[3]).norm();
            if d1 < d2 {
                p.swap(1, 2);
            }
            if d1 < d3 {
                p.swap(1, 3);
            }
            if d2 < d3 {
                p.swap(2, 3);
            }
            Some(Segment { a: p[0], b: p[1] })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_cell_vertical_normal_has_zero_offset() {
        assert_eq!(line_alpha(0.5, Vec2::new(1.0, 0.0)), 0.0);
    }

    #[test]
    fn quarter_cell_horizontal_line() {
        let a = line_alpha(0.25, Vec2::new(0.0, 1.0));
        assert!((a + 0.25).abs() < 1e-14);
    }

    #[test]
    fn area_inverts_alpha_across_orientations() {
        let normals = [
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(0.6, 0.4),
            Vec2::new(-0.3, 0.7),
            Vec2::new(-0.5, -0.5),
        ];
        for n in normals {
            for i in 1..20 {
                let c = i as f64 / 20.0;
                let alpha = line_alpha(c, n);
                assert!((line_area(n, alpha) - c).abs() < 1e-12, "n={n:?} c={c}");
            }
        }
    }

    #[test]
    fn line_area_saturates() {
        let n = Vec2::new(0.3, 0.7);
        assert_eq!(line_area(n, -1.0), 0.0);
        assert_eq!(line_area(n, 1.0), 1.0);
    }

    #[test]
    fn rectangle_fraction_matches_full_cell() {
        let n = Vec2::new(0.4, -0.6);
        let alpha = line_alpha(0.3, n);
        let f = rectangle_fraction(n, alpha, Vec2::new(-0.5, -0.5), Vec2::new(0.5, 0.5));
        assert!((f - 0.3).abs() < 1e-12);
    }

    #[test]
    fn rectangle_fraction_splits_additively() {
        let n = Vec2::new(0.45, 0.55);
        let alpha = line_alpha(0.37, n);
        let left = rectangle_fraction(n, alpha, Vec2::new(-0.5, -0.5), Vec2::new(0.0, 0.5));
        let right = rectangle_fraction(n, alpha, Vec2::new(0.0, -0.5), Vec2::new(0.5, 0.5));
        assert!((0.5 * left + 0.5 * right - 0.37).abs() < 1e-12);
    }

    #[test]
    fn facet_of_vertical_cut() {
        let cfg = GeomCfg::default();
        let seg = unit_square_facet(Line::new(Vec2::new(1.0, 0.0), 0.1), &cfg).unwrap();
        assert!((seg.a.x - 0.1).abs() < 1e-14 && (seg.b.x - 0.1).abs() < 1e-14);
        assert!((seg.a.y - seg.b.y).abs() > 0.9);
    }

    #[test]
    fn facet_missing_the_cell() {
        let cfg = GeomCfg::default();
        assert!(unit_square_facet(Line::new(Vec2::new(1.0, 0.0), 2.0), &cfg).is_none());
    }

    #[test]
    fn near_corner_cut_keeps_most_separated_pair() {
        let cfg = GeomCfg::default();
        // Diagonal line exactly through two corners: four raw crossings.
        let seg = unit_square_facet(Line::new(Vec2::new(1.0, 1.0), 0.0), &cfg).unwrap();
        assert!((seg.a - seg.b).norm() > 1.0);
    }
}
