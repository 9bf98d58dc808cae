//! Per-cell MOF reconstruction: solid clipping + area match.
//!
//! `polygon_alpha` assembles the fluid-accessible region of a cut cell (the
//! unit square minus the solid half-plane), dispatches to the n-gon area
//! solver, and falls back to plain PLIC on the full square when the solid
//! line misses the cell.

use super::ngon::area_match;
use crate::geom::{line_alpha, unit_square_facet, GeomCfg, Line, Polygon, Segment, Vec2};

/// Outcome of the per-cell reconstruction.
#[derive(Clone, Copy, Debug)]
pub struct CutReconstruction {
    /// Interface offset: fluid is `nc·x <= alpha`.
    pub alpha: f64,
    /// Interface facet clipped to the cell, when one exists.
    pub facet: Option<Segment>,
    /// Fluid-accessible region the interface was solved on, in cyclic order.
    pub region: Polygon,
}

/// Solve the interface offset in a cut cell.
///
/// `target` is the fluid area (cell fraction), `nc` the contact-corrected
/// interface normal, `solid` the cell's solid line. Returns `None` when the
/// normal is degenerate or the accessible region has no interior (the solid
/// facet alone, with every corner excluded).
pub fn polygon_alpha(
    target: f64,
    nc: Vec2,
    solid: Line,
    cfg: &GeomCfg,
) -> Option<CutReconstruction> {
    if nc.x == 0.0 && nc.y == 0.0 {
        return None;
    }

    match unit_square_facet(solid, cfg) {
        Some(cut) => region_from_cut(&solid, &cut, cfg).map(|region| {
            let sol = area_match(target, &region, nc, cfg);
            CutReconstruction {
                alpha: sol.alpha,
                facet: Some(sol.facet),
                region,
            }
        }),
        None => {
            // Solid line misses the cell: plain PLIC on the full square.
            let alpha = line_alpha(target, nc);
            let facet = unit_square_facet(Line::new(nc, alpha), cfg);
            Some(CutReconstruction {
                alpha,
                facet,
                region: Polygon::unit_square(),
            })
        }
    }
}

/// Accessible region: the solid facet endpoints plus the cell corners on the
/// fluid side of the solid line, excluding corners the facet already passes
/// through (within `eps_corner`). Ordered cyclically by polar angle.
fn region_from_cut(solid: &Line, cut: &Segment, cfg: &GeomCfg) -> Option<Polygon> {
    let corners = [
        Vec2::new(0.5, 0.5),
        Vec2::new(-0.5, 0.5),
        Vec2::new(-0.5, -0.5),
        Vec2::new(0.5, -0.5),
    ];
    let mut region = Polygon::new();
    region.push(cut.a);
    region.push(cut.b);
    let mut an = 0;
    for v in corners {
        if solid.side(v) <= 0.0 && !coincident(v, cut.a, cfg) && !coincident(v, cut.b, cfg) {
            region.push(v);
            an += 1;
        }
    }
    if !(1..=3).contains(&an) {
        return None;
    }
    Some(sort_cyclic(region))
}

#[inline]
fn coincident(v: Vec2, p: Vec2, cfg: &GeomCfg) -> bool {
    (v.x - p.x).abs() < cfg.eps_corner && (v.y - p.y).abs() < cfg.eps_corner
}

fn sort_cyclic(p: Polygon) -> Polygon {
    let n = p.len();
    let mut v = [Vec2::zeros(); Polygon::CAP];
    v[..n].copy_from_slice(p.as_slice());
    let mut o = Vec2::zeros();
    for q in &v[..n] {
        o += q;
    }
    o /= n as f64;
    let mut ang = [0.0f64; Polygon::CAP];
    for i in 0..n {
        ang[i] = (v[i].y - o.y).atan2(v[i].x - o.x);
    }
    for i in 1..n {
        let mut j = i;
        while j > 0 && ang[j - 1] > ang[j] {
            ang.swap(j - 1, j);
            v.swap(j - 1, j);
            j -= 1;
        }
    }
    let mut out = Polygon::new();
    for q in &v[..n] {
        out.push(*q);
    }
    out
}
