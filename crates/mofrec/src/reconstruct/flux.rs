//! Donor-region clipping for the directional advection flux.
//!
//! `polygon_fraction` computes the fluid area swept out of a mixed cut cell
//! through its downwind face: clip the accessible region to the swept slab,
//! keep the part on the fluid side of the interface, and close the polygon
//! with the interface facet (and its slab intersection when only one facet
//! endpoint lies inside the slab).
//!
//! Everything is mirrored in x for positive sweep sign so a single
//! left-going walk covers both directions.

use crate::geom::{polygon_area, GeomCfg, GeomError, Polygon, Segment, Vec2};

/// Fluid area crossing the face, in cell units (divide by |un| for the face
/// fraction).
///
/// `region` must be in cyclic order (as produced by the reconstruction);
/// `un` is the signed sweep distance, `s` its sign, `facet`/`nc`/`alpha` the
/// cell's interface. The swept slab is `x <= s·un - 1/2` after mirroring.
pub fn polygon_fraction(
    region: &Polygon,
    un: f64,
    s: f64,
    facet: Option<&Segment>,
    nc: Vec2,
    alpha: f64,
    cfg: &GeomCfg,
) -> Result<f64, GeomError> {
    let m = region.len();
    if m == 0 {
        return Err(GeomError::EmptyPolygon);
    }

    // Mirror for positive sweeps; squash denormal coordinates first.
    let flip = if s > 0.0 { -1.0 } else { 1.0 };
    let mut ppf = [Vec2::zeros(); 5];
    for i in 0..m.min(5) {
        let mut v = region[i];
        if v.x.abs() < cfg.eps_tiny {
            v.x = 0.0;
        }
        if v.y.abs() < cfg.eps_tiny {
            v.y = 0.0;
        }
        ppf[i] = Vec2::new(flip * v.x, v.y);
    }
    let mnc = Vec2::new(flip * nc.x, nc.y);
    let mirrored_facet = facet.map(|f| Segment {
        a: Vec2::new(flip * f.a.x, f.a.y),
        b: Vec2::new(flip * f.b.x, f.b.y),
    });

    let xb = s * un - 0.5;

    // Region vertices inside the swept slab, in cyclic index order.
    let mut np = [0usize; 5];
    let mut np_number = 0;
    for i in 0..m.min(5) {
        if ppf[i].x <= xb {
            np[np_number] = i;
            np_number += 1;
        }
    }
    if np_number == 0 {
        return Ok(0.0);
    }
    if np_number > 3 {
        return Err(GeomError::DegenerateClip);
    }

    let wrap = |i: usize, step: i64| -> usize {
        (((i as i64 + step) % m as i64 + m as i64) % m as i64) as usize
    };
    // Intersection of edge from..to with the slab boundary; flat edges
    // (Δy below eps) keep the y of `from`.
    let clip_y = |from: usize, to: usize| -> f64 {
        let (a, b) = (ppf[from], ppf[to]);
        if (b.y - a.y).abs() < 1e-10 {
            a.y
        } else {
            a.y + (xb - a.x) * (b.y - a.y) / (b.x - a.x)
        }
    };

    // Clipped boundary points: inside vertices plus slab-boundary
    // intersections, np_number + 2 in total.
    let mut fp = [Vec2::zeros(); 5];
    let fp_count = np_number + 2;
    match np_number {
        1 => {
            let v = np[0];
            let f = wrap(v, 1);
            let b = wrap(v, -1);
            fp[0] = ppf[v];
            fp[1] = Vec2::new(xb, clip_y(v, f));
            fp[2] = Vec2::new(xb, clip_y(v, b));
        }
        2 => {
            let v = np[0];
            let f = wrap(v, 1);
            let b = wrap(v, -1);
            fp[0] = ppf[v];
            if ppf[b].x <= xb {
                // The run of inside vertices wraps backward from np[0].
                fp[1] = Vec2::new(xb, clip_y(v, f));
                fp[3] = ppf[b];
                let bb = wrap(b, -1);
                fp[2] = Vec2::new(xb, clip_y(b, bb));
            } else {
                fp[1] = Vec2::new(xb, clip_y(v, b));
                fp[3] = ppf[f];
                let ff = wrap(f, 1);
                fp[2] = Vec2::new(xb, clip_y(f, ff));
            }
        }
        _ => {
            let v = np[0];
            let f = wrap(v, 1);
            let b = wrap(v, -1);
            fp[0] = ppf[v];
            if ppf[f].x <= xb {
                let ff = wrap(f, 1);
                fp[1] = ppf[f];
                if ppf[ff].x <= xb {
                    let fff = wrap(ff, 1);
                    fp[2] = ppf[ff];
                    fp[3] = Vec2::new(xb, clip_y(ff, fff));
                    fp[4] = Vec2::new(xb, clip_y(v, b));
                } else {
                    fp[2] = Vec2::new(xb, clip_y(f, ff));
                    let bb = wrap(b, -1);
                    fp[4] = ppf[b];
                    fp[3] = Vec2::new(xb, clip_y(b, bb));
                }
            } else {
                fp[1] = Vec2::new(xb, clip_y(v, f));
                fp[4] = ppf[b];
                let bb = wrap(b, -1);
                fp[3] = ppf[bb];
                let bbb = wrap(bb, -1);
                fp[2] = Vec2::new(xb, clip_y(bb, bbb));
            }
        }
    }

    // Facet endpoints inside the slab seed the clipped fluid polygon; the
    // one left outside (if any) is kept to interpolate the slab crossing.
    let mut ap = [Vec2::zeros(); 6];
    let mut jk = 0;
    let mut lp: Option<Vec2> = None;
    if let Some(fct) = &mirrored_facet {
        for p in [fct.a, fct.b] {
            if p.x <= xb {
                ap[jk] = p;
                jk += 1;
            } else {
                lp = Some(p);
            }
        }
    }

    // Clipped boundary points on the fluid side of the interface.
    let mut oriant = 0;
    for p in &fp[..fp_count] {
        if p.x * mnc.x + p.y * mnc.y - alpha < 0.0 {
            ap[jk + oriant] = *p;
            oriant += 1;
        }
    }

    match jk {
        0 => {
            if oriant == 0 {
                Ok(0.0)
            } else {
                polygon_area(&ap[..oriant])
            }
        }
        2 => polygon_area(&ap[..jk + oriant]),
        1 => {
            let l = lp.ok_or(GeomError::DegenerateClip)?;
            let a0 = ap[0];
            ap[jk + oriant] = Vec2::new(xb, a0.y + (xb - a0.x) * (l.y - a0.y) / (l.x - a0.x));
            polygon_area(&ap[..jk + oriant + 1])
        }
        _ => Err(GeomError::DegenerateClip),
    }
}
