//! Cell classification for the contact-line reconstruction.
//!
//! Every cell gets exactly one class; the extended-fraction builder and the
//! advection sweep branch on it. Numbering is part of the artifact format
//! written by the cli, hence the explicit discriminants.

use super::contact::normal_contact;
use super::fluid::mycs;
use super::solid::{interfacial_wide, CellFaces};
use super::stencil::Stencil3;
use crate::geom::{GeomCfg, Vec2};

/// Cell class. "Cut" refers to the embedded boundary (cs), "mixed" to the
/// fluid fraction within the accessible part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CellClass {
    /// No accessible volume (cs ≤ 0).
    Exterior = 1,
    /// Cut cell, fluid fraction empty (c ≤ eps_vol).
    CutEmpty = 2,
    /// Cut cell, fluid fills the accessible volume (c ≥ cs − eps_vol).
    CutFull = 3,
    /// Cut cell holding the contact line itself.
    ContactLine = 4,
    /// Cut cell with mixed fluid near, but not at, the contact line.
    NearContact = 5,
    /// Regular cell crossed by the fluid interface.
    Interface = 6,
    /// Regular empty cell.
    Empty = 7,
    /// Regular full cell.
    Full = 8,
}

impl CellClass {
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Classify one cell from its cs/c patches, face fractions, and contact
/// angle (radians).
///
/// A mixed cut cell is a contact-line cell unless one of the three cut
/// neighbors in the advancing tangent quadrant is itself genuinely mixed
/// (then the contact line lives there and this cell is only near it); if all
/// three quadrant neighbors are uncut the cell reverts to contact-line.
pub fn classify(
    cs: &Stencil3,
    c: &Stencil3,
    faces: &CellFaces,
    angle: f64,
    cfg: &GeomCfg,
) -> CellClass {
    let csc = cs.center();
    let cc = c.center();

    if csc <= 0.0 {
        return CellClass::Exterior;
    }

    if interfacial_wide(cs) {
        if cc <= cfg.eps_vol {
            return CellClass::CutEmpty;
        }
        if cc >= csc - cfg.eps_vol {
            return CellClass::CutFull;
        }

        let ns = faces.normal().unwrap_or_else(|| Vec2::new(0.5, 0.5));
        let nf = mycs(c);
        let nc = normal_contact(ns, nf, angle);
        // Tangent along the solid, oriented toward the fluid opening.
        let mnc = if ns.x * nc.y - ns.y * nc.x > 0.0 {
            Vec2::new(nc.y, -nc.x)
        } else {
            Vec2::new(-nc.y, nc.x)
        };
        let a = sign2(mnc.x);
        let b = sign2(mnc.y);

        let mixed = |dx: i32, dy: i32| {
            let s = cs.at(dx, dy);
            s > 0.0 && s < 1.0 && c.at(dx, dy) >= cfg.eps_vol && c.at(dx, dy) <= s - cfg.eps_vol
        };
        let uncut = |dx: i32, dy: i32| {
            let s = cs.at(dx, dy);
            s <= 0.0 || s >= 1.0
        };

        let mut contact = true;
        if mixed(a, 0) || mixed(0, b) || mixed(a, b) {
            contact = false;
        }
        if uncut(a, 0) && uncut(0, b) && uncut(a, b) {
            contact = true;
        }
        if contact {
            CellClass::ContactLine
        } else {
            CellClass::NearContact
        }
    } else {
        // cs >= 1 away from the boundary.
        if interfacial_wide(c) {
            CellClass::Interface
        } else if cc <= 0.0 {
            CellClass::Empty
        } else {
            CellClass::Full
        }
    }
}

#[inline]
fn sign2(x: f64) -> i32 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}
