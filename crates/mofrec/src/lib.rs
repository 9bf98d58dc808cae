//! Moment-of-fluid interface reconstruction and advection on embedded
//! boundaries.
//!
//! Layering
//! - [`geom`]: cell-local primitives (PLIC conversions, facet extraction,
//!   the fixed-capacity polygon).
//! - [`reconstruct`]: the per-cell engine (classification, solid and fluid
//!   reconstruction, contact normals, region clipping, flux geometry).
//! - [`field`]: grid-level passes (extended fraction, directional sweeps,
//!   fraction sanitation).
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; breaking
//!   changes are encouraged when they improve quality.

pub mod field;
pub mod geom;
pub mod reconstruct;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom::{GeomCfg, Line, Vec2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::field::{
        advect, clean_small_cells, extended_field, rebuild_face_fractions, AdvectOutcome,
        ExtendedFraction, FaceField, Field, Grid, Marks, TwoPhase,
    };
    pub use crate::geom::{GeomCfg, Line, Polygon, Segment, Vec2};
    pub use crate::reconstruct::{
        classify, interface_normal, normal_contact, polygon_alpha, polygon_fraction, CellClass,
        SolidRec,
    };
}
