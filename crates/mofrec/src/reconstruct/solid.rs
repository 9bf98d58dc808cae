//! Solid (embedded-boundary) line reconstruction per cell.

use super::fluid::mycs;
use super::stencil::{Axis, Stencil3};
use crate::geom::{line_alpha, Line, Vec2};

/// Face fractions of cs on the four faces of one cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct CellFaces {
    pub xm: f64,
    pub xp: f64,
    pub ym: f64,
    pub yp: f64,
}

impl CellFaces {
    /// L1-normalized normal from face-fraction differences, or `None` when
    /// opposite faces cancel.
    pub fn normal(&self) -> Option<Vec2> {
        let n = Vec2::new(self.xm - self.xp, self.ym - self.yp);
        let nn = n.x.abs() + n.y.abs();
        if nn > 0.0 {
            Some(n / nn)
        } else {
            None
        }
    }
}

/// Per-cell solid reconstruction state.
///
/// `Boundary` marks a cell whose cs is saturated yet which touches an empty
/// neighbor (the embedded boundary coincides with a cell face); it carries a
/// normal but no in-cell line. Consumers treat such a neighbor as fully
/// fluid when extrapolating.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SolidRec {
    #[default]
    Uncut,
    Boundary {
        n: Vec2,
    },
    Cut {
        line: Line,
    },
}

impl SolidRec {
    /// The in-cell solid line, for cut cells only.
    #[inline]
    pub fn line(&self) -> Option<Line> {
        match *self {
            SolidRec::Cut { line } => Some(line),
            _ => None,
        }
    }

    /// The solid normal, where one exists.
    #[inline]
    pub fn normal(&self) -> Option<Vec2> {
        match *self {
            SolidRec::Uncut => None,
            SolidRec::Boundary { n } => Some(n),
            SolidRec::Cut { line } => Some(line.n),
        }
    }
}

/// True when the cell is adjacent to the embedded boundary in the wide
/// sense: cut, or saturated/empty with an opposite-state axis neighbor.
pub fn interfacial_wide(s: &Stencil3) -> bool {
    let v = s.center();
    if v >= 1.0 {
        for axis in Axis::BOTH {
            for o in [-1, 1] {
                if s.along(axis, o) <= 0.0 {
                    return true;
                }
            }
        }
        false
    } else if v <= 0.0 {
        for axis in Axis::BOTH {
            for o in [-1, 1] {
                if s.along(axis, o) >= 1.0 {
                    return true;
                }
            }
        }
        false
    } else {
        true
    }
}

/// Reconstruct the solid state of one cell from its cs patch and face
/// fractions.
///
/// Cut cells get a Youngs-type (MYC) normal from cs differences and the
/// offset solved from the fraction; saturated cells on the embedded boundary
/// get the raw face-difference normal (exact for axis-aligned boundaries)
/// and no line.
pub fn reconstruct_solid(cs: &Stencil3, faces: &CellFaces) -> SolidRec {
    let v = cs.center();
    if v <= 0.0 || v >= 1.0 {
        if interfacial_wide(cs) {
            let n = faces.normal().unwrap_or_else(|| Vec2::new(0.5, 0.5));
            SolidRec::Boundary { n }
        } else {
            SolidRec::Uncut
        }
    } else {
        let n = mycs(cs);
        let alpha = line_alpha(v, n);
        SolidRec::Cut {
            line: Line::new(n, alpha),
        }
    }
}
