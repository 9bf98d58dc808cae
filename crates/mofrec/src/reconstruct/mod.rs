//! Per-cell reconstruction engine.
//!
//! Purpose
//! - Classify embedded-boundary cells, reconstruct the solid and fluid
//!   lines, correct the fluid normal for the prescribed contact angle, and
//!   solve the moment-of-fluid offset on the accessible region.
//!
//! Dataflow per cell (all inputs are bounded stencil views):
//!   cs patch ──▶ solid line ─┐
//!   c patch ──▶ fluid normal ─┼─▶ contact normal ─▶ polygon_alpha ─▶ facet
//!   contact angle ────────────┘
//!
//! The advection flux (`polygon_fraction`) consumes the reconstruction of
//! the donor cell.

mod classify;
mod contact;
mod dispatch;
mod flux;
mod fluid;
mod ngon;
mod solid;
mod stencil;

pub use classify::{classify, CellClass};
pub use contact::normal_contact;
pub use dispatch::{polygon_alpha, CutReconstruction};
pub use flux::polygon_fraction;
pub use fluid::{height_normal, interface_normal, myc_normal, mycs};
pub use ngon::{area_match, NgonCut};
pub use solid::{interfacial_wide, reconstruct_solid, CellFaces, SolidRec};
pub use stencil::{Axis, Stencil3, Stencil5};

#[cfg(test)]
mod tests;
