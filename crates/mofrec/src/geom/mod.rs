//! Cell-local geometry (unit square, lines, small convex polygons).
//!
//! Purpose
//! - Everything below the per-cell reconstruction engine: PLIC conversions,
//!   facet extraction, chord/band scalar helpers, and the fixed-capacity
//!   polygon type with its area routine.
//!
//! Conventions
//! - Cell-local coordinates: cell center at the origin, cell = [-1/2, 1/2]².
//! - Fluid side of a line `n·x = alpha` is `n·x <= alpha`.
//! - Tolerances are threaded through `GeomCfg`, never global.

pub mod rand;

mod plic;
mod types;
mod util;

pub use plic::{line_alpha, line_area, rectangle_fraction, unit_square_facet};
pub use types::{GeomCfg, GeomError, Line, Polygon, Segment, Vec2};
pub use util::{icx, polygon_area, rotate, rotation_to_up, yk, ysolve};
