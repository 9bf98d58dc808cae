//! Sanitation of the embedded-boundary fractions.
//!
//! Raw solid fractions (rasterized or imported) carry slivers that starve
//! the advection step: cells almost entirely solid, full cells pinched
//! against them, and face fractions inconsistent with the cell fractions.
//! `clean_small_cells` drops the slivers, shaves the pinched cells, rebuilds
//! the face fractions from per-cell PLIC lines and finally re-derives each
//! cell fraction from its faces where the two disagree.

use super::grid::{FaceField, Field, Grid};
use crate::geom::{line_alpha, line_area, Vec2};
use crate::reconstruct::{mycs, Axis};

/// Fraction of a cell face covered by the fluid side of the line
/// `m·x = alpha`, in the cell-local frame. `right_cell` says which side of
/// the face the cell sits on (the face is then at local -1/2 or +1/2 along
/// the axis).
fn face_fraction_of_line(m: Vec2, alpha: f64, axis: Axis, right_cell: bool) -> f64 {
    let (ma, mt) = match axis {
        Axis::X => (m.x, m.y),
        Axis::Y => (m.y, m.x),
    };
    let ss = if right_cell { -0.5 } else { 0.5 };
    if mt.abs() > 1e-4 {
        let aa = (alpha - ss * ma) / mt;
        if (-0.5..=0.5).contains(&aa) {
            if mt < 0.0 {
                0.5 - aa
            } else {
                0.5 + aa
            }
        } else if aa < -0.5 {
            if mt < 0.0 {
                1.0
            } else {
                0.0
            }
        } else if mt < 0.0 {
            0.0
        } else {
            1.0
        }
    } else if ma > 0.0 {
        if right_cell {
            1.0
        } else {
            0.0
        }
    } else if right_cell {
        0.0
    } else {
        1.0
    }
}

/// Rebuild face fractions from the cell fractions: a face next to an empty
/// cell closes, next to a full cell opens, and between two cut cells takes
/// the mean of the two PLIC face fractions. A closed face between two
/// distinct nonempty cut cells is nudged open so the sweep still sees a
/// connection there.
pub fn rebuild_face_fractions(g: &Grid, cs: &Field<f64>, vtol: f64) -> FaceField {
    let normals = Field::par_from_fn(g.nx, g.ny, |i, j| mycs(&cs.stencil3(i, j)));
    let face = |axis: Axis, fi: usize, fj: usize| -> f64 {
        let (li, lj, ri, rj) = match axis {
            Axis::X => (fi as i64 - 1, fj as i64, fi as i64, fj as i64),
            Axis::Y => (fi as i64, fj as i64 - 1, fi as i64, fj as i64),
        };
        let cl = cs.at(li, lj);
        let cr = cs.at(ri, rj);
        if cl <= vtol || cr <= vtol {
            return 0.0;
        }
        if cl >= 1.0 || cr >= 1.0 {
            return 1.0;
        }
        let nr = normals.at(ri, rj);
        let vr = face_fraction_of_line(nr, line_alpha(cr, nr), axis, true);
        let nl = normals.at(li, lj);
        let vl = face_fraction_of_line(nl, line_alpha(cl, nl), axis, false);
        let mut fsv = 0.5 * (vr + vl);
        if fsv == 0.0 && cl > 1e-4 && cr > 1e-4 && cl != cr {
            fsv = 1e-10;
        }
        fsv
    };
    FaceField {
        x: Field::par_from_fn(g.nx + 1, g.ny, |i, j| face(Axis::X, i, j)),
        y: Field::par_from_fn(g.nx, g.ny + 1, |i, j| face(Axis::Y, i, j)),
    }
}

/// Clean the solid fractions in place and return consistent face fractions.
///
/// Cells below `cs_tol` are emptied, full cells diagonally touching an
/// emptied cell are shaved to `1 - 1.1·cs_tol` so they become cut cells,
/// and cells whose rebuilt faces tell a different story than their fraction
/// are re-derived from the faces.
pub fn clean_small_cells(g: &Grid, cs: &mut Field<f64>, cs_tol: f64) -> FaceField {
    let step1 = Field::par_from_fn(g.nx, g.ny, |i, j| {
        let v = cs.get(i, j);
        if v < cs_tol {
            0.0
        } else {
            v
        }
    });

    let step2 = Field::par_from_fn(g.nx, g.ny, |i, j| {
        let v = step1.get(i, j);
        let (i, j) = (i as i64, j as i64);
        if v >= 1.0
            && [(1, 1), (1, -1), (-1, 1), (-1, -1)]
                .iter()
                .any(|&(di, dj)| step1.at(i + di, j + dj) < cs_tol)
        {
            1.0 - 1.1 * cs_tol
        } else {
            v
        }
    });
    *cs = step2;

    let fs = rebuild_face_fractions(g, cs, cs_tol);

    let fixed = {
        let cs = &*cs;
        let fs = &fs;
        Field::par_from_fn(g.nx, g.ny, |i, j| {
            let faces = fs.cell_faces(i, j);
            let vals = [faces.xm, faces.xp, faces.ym, faces.yp];
            let mut markface = vals.iter().filter(|&&f| f > 0.0 && f < 1.0).count();

            // Corner patterns: one face of the pair closed, the pair still
            // carrying at least a full face worth of opening.
            let mut special = false;
            let mut corner = (0.0, 0.0);
            for (fa, fb, x1, y1) in [
                (faces.xm, faces.ym, -0.5, -0.5),
                (faces.xm, faces.yp, -0.5, 0.5),
                (faces.xp, faces.ym, 0.5, -0.5),
                (faces.xp, faces.yp, 0.5, 0.5),
            ] {
                if fa * fb == 0.0 && fa + fb >= 1.0 {
                    markface += 1;
                    special = true;
                    corner = (x1, y1);
                }
            }

            if markface != 2 {
                let product = faces.xm * faces.xp * faces.ym * faces.yp;
                let sum = faces.xm + faces.xp + faces.ym + faces.yp;
                if vals.iter().all(|&f| f == 1.0) || (product == 0.0 && sum >= 3.0 - cs_tol) {
                    1.0
                } else if vals.iter().all(|&f| f == 0.0) {
                    0.0
                } else {
                    cs.get(i, j)
                }
            } else {
                // Two cut faces (or a corner) determine a line; re-derive
                // the cell fraction from it.
                let mut n = Vec2::new(faces.xm - faces.xp, faces.ym - faces.yp);
                let nn = n.x.abs() + n.y.abs();
                if nn > 0.0 {
                    n /= nn;
                } else {
                    n = Vec2::new(0.5, 0.5);
                }
                let (x1, y1) = if special {
                    corner
                } else if faces.xm > 0.0 && faces.xm < 1.0 {
                    (
                        -0.5,
                        if n.y < 0.0 { 0.5 - faces.xm } else { faces.xm - 0.5 },
                    )
                } else if faces.xp > 0.0 && faces.xp < 1.0 {
                    (
                        0.5,
                        if n.y < 0.0 { 0.5 - faces.xp } else { faces.xp - 0.5 },
                    )
                } else if faces.ym > 0.0 && faces.ym < 1.0 {
                    (
                        if n.x < 0.0 { 0.5 - faces.ym } else { faces.ym - 0.5 },
                        -0.5,
                    )
                } else if faces.yp > 0.0 && faces.yp < 1.0 {
                    (
                        if n.x < 0.0 { 0.5 - faces.yp } else { faces.yp - 0.5 },
                        0.5,
                    )
                } else {
                    (0.0, 0.0)
                };
                if x1 != 0.0 && y1 != 0.0 {
                    line_area(n, n.x * x1 + n.y * y1)
                } else {
                    cs.get(i, j)
                }
            }
        })
    };
    *cs = fixed;
    fs
}
