//! Extended fluid-fraction field.
//!
//! Removes the embedded solid from the fraction field so downstream
//! height-function/curvature code sees a plain two-phase field: contact
//! cells are replaced by the full-cell area of their contact-corrected MOF
//! line, near-contact cells absorb the solid volume when the contact line
//! advances toward them, and solid cells receive an extrapolation of the
//! nearby reconstructions.
//!
//! Three strictly ordered passes, each a parallel map (the neighbor
//! propagation of pass 2 is double-buffered so the result does not depend
//! on traversal order).

use tracing::warn;

use super::grid::Field;
use super::passes::{ExtendedFraction, FluidField, Marks, SolidField, TwoPhase};
use crate::geom::{line_alpha, line_area, rectangle_fraction, GeomCfg, Vec2};
use crate::reconstruct::{normal_contact, polygon_alpha, CellClass, SolidRec};

#[inline]
fn sign2(x: f64) -> i64 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Contact-corrected interface offset of a cut neighbor, for extrapolation:
/// the MOF solve on its accessible region, or plain PLIC when the boundary
/// coincides with a cell face. `None` when the geometry is degenerate.
fn neighbor_alpha(
    cv: f64,
    nnc: Vec2,
    solid: &SolidRec,
    cfg: &GeomCfg,
) -> Option<f64> {
    match *solid {
        SolidRec::Cut { line } => polygon_alpha(cv, nnc, line, cfg).map(|r| r.alpha),
        SolidRec::Boundary { .. } => Some(line_alpha(cv, nnc)),
        SolidRec::Uncut => None,
    }
}

/// Build the extended fraction field from the finalized marks, solid lines
/// and fluid normals.
pub fn extend_fraction(
    state: &TwoPhase,
    marks: &Marks,
    solid: &SolidField,
    fluid: &FluidField,
    cfg: &GeomCfg,
) -> ExtendedFraction {
    let g = &state.grid;
    let theta = |i: i64, j: i64| state.angle.at(i, j).to_radians();

    // Pass 1: mark-wise assignment.
    let pass1 = Field::par_from_fn(g.nx, g.ny, |i, j| {
        let cv = state.c.get(i, j);
        let csv = state.cs.get(i, j);
        match marks.mark.get(i, j) {
            CellClass::CutEmpty => 0.0,
            CellClass::CutFull => 1.0,
            CellClass::ContactLine => {
                let (Some(mc), Some(sl)) = (fluid.n.get(i, j), solid.rec.get(i, j).line())
                else {
                    return cv;
                };
                let nnc = normal_contact(sl.n, mc, theta(i as i64, j as i64));
                match polygon_alpha(cv, nnc, sl, cfg) {
                    Some(rec) => line_area(nnc, rec.alpha),
                    None => {
                        warn!(i, j, "degenerate contact cell, keeping raw fraction");
                        cv
                    }
                }
            }
            CellClass::NearContact => {
                let (Some(mc), Some(sl)) = (fluid.n.get(i, j), solid.rec.get(i, j).line())
                else {
                    return cv;
                };
                let nnc = normal_contact(sl.n, mc, theta(i as i64, j as i64));
                // Quadrant the contact line advances into, along the solid
                // tangent.
                let mst = Vec2::new(sl.n.y, -sl.n.x);
                let (a, b) = if mst.dot(&nnc) >= 0.0 {
                    (sign2(mst.x), sign2(mst.y))
                } else {
                    (-sign2(mst.x), -sign2(mst.y))
                };
                let probes = [
                    (a, 0),
                    (0, b),
                    (a, b),
                    (2 * a, 0),
                    (0, 2 * b),
                    (2 * a, 2 * b),
                    (a, 2 * b),
                    (2 * a, b),
                ];
                let near_contact_line = probes.iter().any(|&(dx, dy)| {
                    marks.mark.at(i as i64 + dx, j as i64 + dy) == CellClass::ContactLine
                });
                if near_contact_line {
                    cv + 1.0 - csv
                } else {
                    cv
                }
            }
            _ => cv,
        }
    });

    // Pass 2: near-contact cells that kept their raw fraction but touch an
    // already-absorbed neighbor absorb the solid volume too.
    let pass2 = Field::par_from_fn(g.nx, g.ny, |i, j| {
        let cv = state.c.get(i, j);
        let cur = pass1.get(i, j);
        if marks.mark.get(i, j) != CellClass::NearContact || cur != cv {
            return cur;
        }
        for (dx, dy) in [(-1i64, 0i64), (1, 0), (0, -1), (0, 1)] {
            let (ni, nj) = (i as i64 + dx, j as i64 + dy);
            let ncs = state.cs.at(ni, nj);
            if ncs > 0.0
                && ncs < 1.0
                && pass1.at(ni, nj) == state.c.at(ni, nj) + 1.0 - ncs
            {
                return cv + 1.0 - state.cs.get(i, j);
            }
        }
        cur
    });

    // Pass 3: extrapolate into solid cells and into saturated/empty cut
    // cells near a contact line, from the radius-2 neighborhood.
    let frac = Field::par_from_fn(g.nx, g.ny, |i, j| {
        let csv = state.cs.get(i, j);
        match marks.mark.get(i, j) {
            CellClass::Exterior => {
                let mut tmp;
                // Saturated cut neighbors: their inverted solid line, with
                // the largest covered fraction winning. A boundary-aligned
                // neighbor covers this cell fully.
                let mut fc2: f64 = 0.0;
                let mut sfc2 = 0.0;
                for di in -2i64..=2 {
                    for dj in -2i64..=2 {
                        let (ni, nj) = (i as i64 + di, j as i64 + dj);
                        if marks.mark.at(ni, nj) != CellClass::CutFull {
                            continue;
                        }
                        match solid.rec.at(ni, nj) {
                            SolidRec::Cut { line } => {
                                sfc2 += 1.0;
                                let a = Vec2::new(-di as f64 - 0.5, -dj as f64 - 0.5);
                                let b = a.add_scalar(1.0);
                                fc2 = fc2.max(rectangle_fraction(-line.n, -line.alpha, a, b));
                            }
                            SolidRec::Boundary { .. } => {
                                sfc2 += 1.0;
                                fc2 = 1.0;
                            }
                            SolidRec::Uncut => {}
                        }
                    }
                }
                tmp = if sfc2 > 0.0 { fc2 } else { 0.0 };

                // Contact neighbors override with the average of their
                // extrapolated MOF lines.
                let mut fc1 = 0.0;
                let mut sfc1 = 0.0;
                for di in -2i64..=2 {
                    for dj in -2i64..=2 {
                        let (ni, nj) = (i as i64 + di, j as i64 + dj);
                        if marks.mark.at(ni, nj) != CellClass::ContactLine {
                            continue;
                        }
                        let Some(mc) = fluid.n.at(ni, nj) else { continue };
                        let srec = solid.rec.at(ni, nj);
                        let Some(ns) = srec.normal() else { continue };
                        let nnc = normal_contact(ns, mc, theta(ni, nj));
                        let Some(alpha) = neighbor_alpha(state.c.at(ni, nj), nnc, &srec, cfg)
                        else {
                            continue;
                        };
                        sfc1 += 1.0;
                        let a = Vec2::new(-di as f64 - 0.5, -dj as f64 - 0.5);
                        let b = a.add_scalar(1.0);
                        fc1 += rectangle_fraction(nnc, alpha, a, b);
                    }
                }
                if sfc1 > 0.0 {
                    tmp = fc1 / sfc1;
                }
                tmp
            }
            CellClass::CutEmpty | CellClass::CutFull if csv > 0.0 && csv < 1.0 => {
                // Find the contact normal of the nearest contact cell (the
                // last one in scan order wins, matching the reference
                // traversal).
                let mut found: Option<(Vec2, Vec2)> = None;
                for di in -2i64..=2 {
                    for dj in -2i64..=2 {
                        let (ni, nj) = (i as i64 + di, j as i64 + dj);
                        if marks.mark.at(ni, nj) != CellClass::ContactLine {
                            continue;
                        }
                        if let (Some(mc), Some(ns)) =
                            (fluid.n.at(ni, nj), solid.rec.at(ni, nj).normal())
                        {
                            found = Some((normal_contact(ns, mc, theta(ni, nj)), ns));
                        }
                    }
                }
                let Some((nc, ms)) = found else {
                    return pass2.get(i, j);
                };
                let mst = Vec2::new(nc.y, -nc.x);
                let (aa, bb) = if mst.dot(&ms) >= 0.0 {
                    (sign2(mst.x), sign2(mst.y))
                } else {
                    (-sign2(mst.x), -sign2(mst.y))
                };

                // Average the contact neighbors lying in the receding
                // quadrant.
                let mut fc1 = 0.0;
                let mut sfc1 = 0.0;
                for di in -2i64..=2 {
                    for dj in -2i64..=2 {
                        if -di * aa < 0 || -dj * bb < 0 {
                            continue;
                        }
                        let (ni, nj) = (i as i64 + di, j as i64 + dj);
                        if marks.mark.at(ni, nj) != CellClass::ContactLine {
                            continue;
                        }
                        let Some(mc) = fluid.n.at(ni, nj) else { continue };
                        let srec = solid.rec.at(ni, nj);
                        let Some(ns) = srec.normal() else { continue };
                        let nnc = normal_contact(ns, mc, theta(ni, nj));
                        let Some(alpha) = neighbor_alpha(state.c.at(ni, nj), nnc, &srec, cfg)
                        else {
                            continue;
                        };
                        sfc1 += 1.0;
                        let a = Vec2::new(-di as f64 - 0.5, -dj as f64 - 0.5);
                        let b = a.add_scalar(1.0);
                        fc1 += rectangle_fraction(nnc, alpha, a, b);
                    }
                }
                if sfc1 > 0.0 {
                    fc1 / sfc1
                } else {
                    pass2.get(i, j)
                }
            }
            _ => pass2.get(i, j),
        }
    });

    ExtendedFraction { frac }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::grid::{FaceField, Grid};
    use crate::geom::Line;

    /// Hand-built marks over a half-cut floor row: a contact cell at (1, 1)
    /// and three near-contact cells trailing to its right, all with the
    /// fluid opening to the left.
    fn trailing_contact() -> (TwoPhase, Marks, SolidField, FluidField) {
        let g = Grid::new(6, 3, 1.0);
        let cs = Field::from_fn(6, 3, |_, j| match j {
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
        let c = Field::from_fn(6, 3, |i, j| if j == 1 { 0.1 * (i + 1) as f64 } else { 0.0 });
        let angle = Field::fill(6, 3, 90.0);
        let state = TwoPhase::new(g, cs, fs, c, angle);

        let mark = Field::from_fn(6, 3, |i, j| match (i, j) {
            (1, 1) => CellClass::ContactLine,
            (2..=4, 1) => CellClass::NearContact,
            (_, 1) => CellClass::CutEmpty,
            (_, 0) => CellClass::Exterior,
            _ => CellClass::Empty,
        });
        let floor = SolidRec::Cut {
            line: Line::new(Vec2::new(0.0, -1.0), 0.0),
        };
        let rec = Field::from_fn(6, 3, |_, j| if j == 1 { floor } else { SolidRec::Uncut });
        // Fluid to the left of every mixed cell.
        let n = Field::from_fn(6, 3, |_, j| {
            if j == 1 {
                Some(Vec2::new(-1.0, 0.0))
            } else {
                None
            }
        });
        (state, Marks { mark }, SolidField { rec }, FluidField { n })
    }

    #[test]
    fn near_contact_cells_absorb_the_solid_volume() {
        let cfg = GeomCfg::default();
        let (state, marks, solid, fluid) = trailing_contact();
        let ext = extend_fraction(&state, &marks, &solid, &fluid, &cfg);

        // (2, 1) and (3, 1) see the contact cell within their advancing
        // quadrant (one and two cells away) and absorb 1 - cs directly.
        assert_eq!(ext.frac.get(2, 1), 0.3 + 0.5);
        assert_eq!(ext.frac.get(3, 1), 0.4 + 0.5);
        // (4, 1) is out of probe range and only absorbs through the
        // second-pass neighbor propagation.
        assert_eq!(ext.frac.get(4, 1), 0.5 + 0.5);
    }

    #[test]
    fn quadrant_facing_away_keeps_the_raw_fraction() {
        let cfg = GeomCfg::default();
        let (state, marks, solid, mut fluid) = trailing_contact();
        // Flip the fluid side of the trailing cells: their advancing
        // quadrant now points away from the contact cell.
        for i in 2..=4 {
            fluid.n.set(i, 1, Some(Vec2::new(1.0, 0.0)));
        }
        let ext = extend_fraction(&state, &marks, &solid, &fluid, &cfg);
        assert_eq!(ext.frac.get(2, 1), 0.3);
        assert_eq!(ext.frac.get(4, 1), 0.5);
    }
}
