//! Uniform-grid storage for cell and face scalars.
//!
//! Conventions
//! - Cell (i, j) spans [i·Δ, (i+1)·Δ] × [j·Δ, (j+1)·Δ]; all per-cell geometry
//!   works in the cell-local frame [-1/2, 1/2]².
//! - Face fields are stored per axis: `x` has nx+1 columns (face i sits
//!   between cells i-1 and i), `y` has ny+1 rows.
//! - Out-of-range reads clamp to the nearest cell, which reproduces a
//!   zero-gradient ghost layer.

use rayon::prelude::*;

use crate::reconstruct::{CellFaces, Stencil3, Stencil5};

/// Uniform Cartesian grid.
#[derive(Clone, Copy, Debug)]
pub struct Grid {
    pub nx: usize,
    pub ny: usize,
    /// Cell size.
    pub delta: f64,
}

impl Grid {
    pub fn new(nx: usize, ny: usize, delta: f64) -> Self {
        Self { nx, ny, delta }
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.nx * self.ny
    }
}

/// Flat row-major cell field.
#[derive(Clone, Debug, PartialEq)]
pub struct Field<T> {
    nx: usize,
    ny: usize,
    data: Vec<T>,
}

impl<T: Copy> Field<T> {
    pub fn fill(nx: usize, ny: usize, v: T) -> Self {
        Self {
            nx,
            ny,
            data: vec![v; nx * ny],
        }
    }

    pub fn from_fn(nx: usize, ny: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                data.push(f(i, j));
            }
        }
        Self { nx, ny, data }
    }

    /// Parallel constructor; rows are filled independently.
    pub fn par_from_fn<F>(nx: usize, ny: usize, f: F) -> Self
    where
        T: Send,
        F: Fn(usize, usize) -> T + Sync,
    {
        let data = (0..ny)
            .into_par_iter()
            .flat_map_iter(|j| {
                let f = &f;
                (0..nx).map(move |i| f(i, j))
            })
            .collect();
        Self { nx, ny, data }
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[j * self.nx + i]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: T) {
        self.data[j * self.nx + i] = v;
    }

    /// Clamped read: out-of-range indices snap to the boundary cell.
    #[inline]
    pub fn at(&self, i: i64, j: i64) -> T {
        let i = i.clamp(0, self.nx as i64 - 1) as usize;
        let j = j.clamp(0, self.ny as i64 - 1) as usize;
        self.data[j * self.nx + i]
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        &self.data
    }
}

impl Field<f64> {
    /// Radius-1 patch centered on (i, j).
    pub fn stencil3(&self, i: usize, j: usize) -> Stencil3 {
        Stencil3::from_fn(|dx, dy| self.at(i as i64 + dx as i64, j as i64 + dy as i64))
    }

    /// Radius-2 patch centered on (i, j).
    pub fn stencil5(&self, i: usize, j: usize) -> Stencil5 {
        Stencil5::from_fn(|dx, dy| self.at(i as i64 + dx as i64, j as i64 + dy as i64))
    }
}

/// Per-axis face fractions (or face velocities).
#[derive(Clone, Debug, PartialEq)]
pub struct FaceField {
    /// (nx+1) × ny; `x.get(i, j)` is the face between cells i-1 and i.
    pub x: Field<f64>,
    /// nx × (ny+1); `y.get(i, j)` is the face between cells j-1 and j.
    pub y: Field<f64>,
}

impl FaceField {
    pub fn fill(g: &Grid, v: f64) -> Self {
        Self {
            x: Field::fill(g.nx + 1, g.ny, v),
            y: Field::fill(g.nx, g.ny + 1, v),
        }
    }

    pub fn from_fns(
        g: &Grid,
        fx: impl FnMut(usize, usize) -> f64,
        fy: impl FnMut(usize, usize) -> f64,
    ) -> Self {
        Self {
            x: Field::from_fn(g.nx + 1, g.ny, fx),
            y: Field::from_fn(g.nx, g.ny + 1, fy),
        }
    }

    /// The four face values around cell (i, j).
    #[inline]
    pub fn cell_faces(&self, i: usize, j: usize) -> CellFaces {
        CellFaces {
            xm: self.x.get(i, j),
            xp: self.x.get(i + 1, j),
            ym: self.y.get(i, j),
            yp: self.y.get(i, j + 1),
        }
    }
}
