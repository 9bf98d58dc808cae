//! Basic cell-local types and tolerances.
//!
//! - `GeomCfg`: centralizes epsilons for volume cutoffs, band snapping, and
//!   corner/edge coincidence checks.
//! - `Line`: interface line `n·x = alpha` in cell-local coordinates, with the
//!   fluid on the side `n·x <= alpha`.
//! - `Segment`: an interface facet clipped to the cell.
//! - `Polygon`: fixed-capacity vertex list for the fluid-accessible region
//!   (at most 2 facet endpoints + 4 cell corners).
//!
//! Cell-local coordinates put the cell center at the origin, so every cell is
//! the unit square [-1/2, 1/2]².

use nalgebra::Vector2;

pub type Vec2 = Vector2<f64>;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Volume-fraction cutoff below which a fraction counts as empty (and
    /// above `1 - eps_vol`, full).
    pub eps_vol: f64,
    /// Area-threshold snapping in the n-gon band solver.
    pub eps_band: f64,
    /// Corner/crossing coincidence test in the region dispatcher.
    pub eps_corner: f64,
    /// Edge identification in the flux clipper.
    pub eps_edge: f64,
    /// Near-axis guard for line-edge intersection denominators.
    pub eps_axis: f64,
    /// Additive denominator guard.
    pub eps_tiny: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_vol: 1e-10,
            eps_band: 1e-10,
            eps_corner: 1e-12,
            eps_edge: 1e-6,
            eps_axis: 1e-4,
            eps_tiny: 1e-30,
        }
    }
}

/// Interface line `n · x = alpha`; fluid occupies `n · x <= alpha`.
///
/// `n` is not required to be normalized: `alpha` always scales with `n`, and
/// every consumer is scale-consistent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub n: Vec2,
    pub alpha: f64,
}

impl Line {
    #[inline]
    pub fn new(n: Vec2, alpha: f64) -> Self {
        Self { n, alpha }
    }
    /// Signed side of `p`: negative on the fluid side.
    #[inline]
    pub fn side(&self, p: Vec2) -> f64 {
        self.n.dot(&p) - self.alpha
    }
}

/// Interface facet endpoints in cell-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

/// Fixed-capacity polygon (≤ 6 vertices, no heap).
///
/// Vertices are stored in insertion order; routines that need a cyclic order
/// sort by polar angle around the centroid themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct Polygon {
    verts: [Vec2; Polygon::CAP],
    len: usize,
}

impl Polygon {
    pub const CAP: usize = 6;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The unit cell [-1/2, 1/2]², corners counterclockwise from (+,+).
    pub fn unit_square() -> Self {
        let mut p = Self::new();
        p.push(Vec2::new(0.5, 0.5));
        p.push(Vec2::new(-0.5, 0.5));
        p.push(Vec2::new(-0.5, -0.5));
        p.push(Vec2::new(0.5, -0.5));
        p
    }

    /// Appends a vertex; silently ignores pushes beyond capacity (callers
    /// construct at most `CAP` vertices by case analysis).
    #[inline]
    pub fn push(&mut self, v: Vec2) {
        if self.len < Self::CAP {
            self.verts[self.len] = v;
            self.len += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Vec2] {
        &self.verts[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.as_slice().iter()
    }
}

impl std::ops::Index<usize> for Polygon {
    type Output = Vec2;
    #[inline]
    fn index(&self, i: usize) -> &Vec2 {
        &self.as_slice()[i]
    }
}

/// Degenerate-geometry failures. Field-level callers map these to zero
/// contributions and warn instead of aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeomError {
    #[error("polygon has no valid vertices")]
    EmptyPolygon,
    #[error("flux clip walk reached an inconsistent vertex count")]
    DegenerateClip,
}
