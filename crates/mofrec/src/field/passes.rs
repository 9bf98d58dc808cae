//! Grid-level reconstruction passes.
//!
//! Each pass is an embarrassingly-parallel map over cells reading only the
//! previous pass's finalized output plus a bounded neighborhood of the input
//! scalars. Pass order is enforced through the types: the extended-fraction
//! builder takes `&Marks`, `&SolidField` and `&FluidField` by reference, so
//! it cannot run before they exist.

use super::extend::extend_fraction;
use super::grid::{FaceField, Field, Grid};
use crate::geom::{GeomCfg, Vec2};
use crate::reconstruct::{
    classify, interface_normal, myc_normal, reconstruct_solid, CellClass, SolidRec,
};

/// Two-phase cell state owned by the caller: solid fraction, solid face
/// fractions, fluid fraction and the prescribed contact angle (degrees).
#[derive(Clone, Debug)]
pub struct TwoPhase {
    pub grid: Grid,
    pub cs: Field<f64>,
    pub fs: FaceField,
    pub c: Field<f64>,
    pub angle: Field<f64>,
}

impl TwoPhase {
    pub fn new(grid: Grid, cs: Field<f64>, fs: FaceField, c: Field<f64>, angle: Field<f64>) -> Self {
        debug_assert_eq!(cs.nx(), grid.nx);
        debug_assert_eq!(c.ny(), grid.ny);
        debug_assert_eq!(fs.x.nx(), grid.nx + 1);
        debug_assert_eq!(fs.y.ny(), grid.ny + 1);
        Self {
            grid,
            cs,
            fs,
            c,
            angle,
        }
    }
}

/// Output of the classification pass.
pub struct Marks {
    pub mark: Field<CellClass>,
}

/// Output of the solid reconstruction pass.
pub struct SolidField {
    pub rec: Field<SolidRec>,
}

/// Output of the fluid-normal pass; `None` where the fraction is pure.
pub struct FluidField {
    pub n: Field<Option<Vec2>>,
}

/// Output of the extended-fraction pass.
pub struct ExtendedFraction {
    pub frac: Field<f64>,
}

/// Classify every cell (the mark field is recomputed each pass, never
/// persisted).
pub fn classify_cells(state: &TwoPhase, cfg: &GeomCfg) -> Marks {
    let g = &state.grid;
    let mark = Field::par_from_fn(g.nx, g.ny, |i, j| {
        classify(
            &state.cs.stencil3(i, j),
            &state.c.stencil3(i, j),
            &state.fs.cell_faces(i, j),
            state.angle.get(i, j).to_radians(),
            cfg,
        )
    });
    Marks { mark }
}

/// Reconstruct the embedded-boundary line in every cell.
pub fn reconstruct_solid_field(state: &TwoPhase) -> SolidField {
    let g = &state.grid;
    let rec = Field::par_from_fn(g.nx, g.ny, |i, j| {
        reconstruct_solid(&state.cs.stencil3(i, j), &state.fs.cell_faces(i, j))
    });
    SolidField { rec }
}

/// Fluid normals, height-function first with MYC fallback.
pub fn fluid_normals(state: &TwoPhase, cfg: &GeomCfg) -> FluidField {
    let g = &state.grid;
    let n = Field::par_from_fn(g.nx, g.ny, |i, j| {
        interface_normal(&state.c.stencil5(i, j), cfg)
    });
    FluidField { n }
}

/// Fluid normals from MYC only, used when the extended field is rebuilt
/// after an advection step.
pub fn fluid_normals_myc(state: &TwoPhase) -> FluidField {
    let g = &state.grid;
    let n = Field::par_from_fn(g.nx, g.ny, |i, j| myc_normal(&state.c.stencil3(i, j)));
    FluidField { n }
}

/// Full reconstruction pipeline: marks, solid lines, MYC fluid normals and
/// the extended fraction, in order.
pub fn extended_field(state: &TwoPhase, cfg: &GeomCfg) -> (Marks, SolidField, ExtendedFraction) {
    let marks = classify_cells(state, cfg);
    let solid = reconstruct_solid_field(state);
    let fluid = fluid_normals_myc(state);
    let ext = extend_fraction(state, &marks, &solid, &fluid, cfg);
    (marks, solid, ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat solid floor through row 1: row 0 is solid, row 1 is half-cut,
    /// rows 2-3 are open. Fluid fills columns 0-1 and half of column 2
    /// (vertical interface through the column-2 cell centers).
    pub(super) fn wetted_floor() -> TwoPhase {
        let g = Grid::new(5, 4, 1.0);
        let cs = Field::from_fn(5, 4, |_, j| match j {
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
        let c = Field::from_fn(5, 4, |i, j| {
            let open = match j {
                0 => 0.0,
                1 => 0.5,
                _ => 1.0,
            };
            match i {
                0 | 1 => open,
                2 => 0.5 * open,
                _ => 0.0,
            }
        });
        let angle = Field::fill(5, 4, 90.0);
        TwoPhase::new(g, cs, fs, c, angle)
    }

    #[test]
    fn wetted_floor_marks() {
        let cfg = GeomCfg::default();
        let state = wetted_floor();
        let marks = classify_cells(&state, &cfg);
        assert_eq!(marks.mark.get(0, 0), CellClass::Exterior);
        assert_eq!(marks.mark.get(0, 1), CellClass::CutFull);
        assert_eq!(marks.mark.get(1, 1), CellClass::CutFull);
        assert_eq!(marks.mark.get(2, 1), CellClass::ContactLine);
        assert_eq!(marks.mark.get(3, 1), CellClass::CutEmpty);
        assert_eq!(marks.mark.get(2, 2), CellClass::Interface);
        assert_eq!(marks.mark.get(0, 2), CellClass::Full);
        assert_eq!(marks.mark.get(4, 2), CellClass::Empty);
    }

    #[test]
    fn solid_field_reconstructs_the_floor() {
        let state = wetted_floor();
        let solid = reconstruct_solid_field(&state);
        match solid.rec.get(2, 1) {
            SolidRec::Cut { line } => {
                // Open side above: the solid normal points down, the line
                // passes through the cell center.
                assert!(line.n.y < -0.9, "n={:?}", line.n);
                assert!(line.alpha.abs() < 1e-12);
            }
            other => panic!("expected cut floor cell, got {other:?}"),
        }
        assert_eq!(solid.rec.get(0, 3), SolidRec::Uncut);
    }

    #[test]
    fn reconstruction_reruns_are_bit_identical() {
        let state = wetted_floor();
        let a = reconstruct_solid_field(&state);
        let b = reconstruct_solid_field(&state);
        assert_eq!(a.rec, b.rec);
        let na = fluid_normals_myc(&state);
        let nb = fluid_normals_myc(&state);
        assert_eq!(na.n, nb.n);
    }

    #[test]
    fn extended_field_straightens_the_contact_cell() {
        let cfg = GeomCfg::default();
        let state = wetted_floor();
        let (_, _, ext) = extended_field(&state, &cfg);
        // The contact cell holds 0.25 fluid in an accessible half-cell; the
        // extended fraction removes the solid, leaving a vertical interface
        // through the center.
        assert!((ext.frac.get(2, 1) - 0.5).abs() < 1e-9, "{}", ext.frac.get(2, 1));
        // Saturated and empty cut cells map to 1 and 0.
        assert_eq!(ext.frac.get(1, 1), 1.0);
        assert_eq!(ext.frac.get(3, 1), 0.0);
        // Solid cells extrapolate the nearby reconstructions: full fluid
        // above gives 1, the contact cell continues its vertical interface.
        assert_eq!(ext.frac.get(0, 0), 1.0);
        assert!((ext.frac.get(2, 0) - 0.5).abs() < 1e-9, "{}", ext.frac.get(2, 0));
        // Uncut cells keep their fraction.
        assert_eq!(ext.frac.get(2, 2), 0.5);
    }
}
