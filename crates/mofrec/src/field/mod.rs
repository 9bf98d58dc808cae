//! Grid-level layer: fields, reconstruction passes and advection.
//!
//! Purpose
//! - Lift the per-cell engine in [`crate::reconstruct`] onto uniform grids:
//!   classification, solid and fluid reconstruction, the extended fraction,
//!   the directional advection sweeps and the fraction sanitation pass.
//!
//! Conventions
//! - All passes are pure maps from finalized inputs to a fresh field, so
//!   results never depend on traversal order; rows are processed in
//!   parallel.
//! - Out-of-range reads clamp to the boundary cell (zero-gradient ghosts).

mod clean;
mod extend;
mod grid;
mod passes;
mod sweep;

pub use clean::{clean_small_cells, rebuild_face_fractions};
pub use extend::extend_fraction;
pub use grid::{FaceField, Field, Grid};
pub use passes::{
    classify_cells, extended_field, fluid_normals, fluid_normals_myc, reconstruct_solid_field,
    ExtendedFraction, FluidField, Marks, SolidField, TwoPhase,
};
pub use sweep::{advect, sweep_axis, AdvectOutcome};
