//! Bounded read-only neighborhood views of a scalar field.
//!
//! The per-cell routines never touch the grid directly; they receive a
//! radius-1 or radius-2 patch of the scalars they need, indexed by signed
//! offsets from the center cell. Both axes are handled by the same code via
//! [`Axis`].

/// Grid axis, for code that sweeps both directions symmetrically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    /// Unit offset along the axis.
    #[inline]
    pub fn unit(self) -> (i32, i32) {
        match self {
            Axis::X => (1, 0),
            Axis::Y => (0, 1),
        }
    }

    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// Radius-1 scalar patch (3×3), offsets in [-1, 1].
#[derive(Clone, Copy, Debug, Default)]
pub struct Stencil3 {
    v: [[f64; 3]; 3],
}

impl Stencil3 {
    pub fn from_fn(mut f: impl FnMut(i32, i32) -> f64) -> Self {
        let mut v = [[0.0; 3]; 3];
        for (i, col) in v.iter_mut().enumerate() {
            for (j, x) in col.iter_mut().enumerate() {
                *x = f(i as i32 - 1, j as i32 - 1);
            }
        }
        Self { v }
    }

    #[inline]
    pub fn at(&self, dx: i32, dy: i32) -> f64 {
        self.v[(dx + 1) as usize][(dy + 1) as usize]
    }

    #[inline]
    pub fn center(&self) -> f64 {
        self.at(0, 0)
    }

    /// Axis-aligned neighbor at signed `offset` (|offset| ≤ 1).
    #[inline]
    pub fn along(&self, axis: Axis, offset: i32) -> f64 {
        let (ux, uy) = axis.unit();
        self.at(ux * offset, uy * offset)
    }
}

/// Radius-2 scalar patch (5×5), offsets in [-2, 2].
#[derive(Clone, Copy, Debug)]
pub struct Stencil5 {
    v: [[f64; 5]; 5],
}

impl Stencil5 {
    pub fn from_fn(mut f: impl FnMut(i32, i32) -> f64) -> Self {
        let mut v = [[0.0; 5]; 5];
        for (i, col) in v.iter_mut().enumerate() {
            for (j, x) in col.iter_mut().enumerate() {
                *x = f(i as i32 - 2, j as i32 - 2);
            }
        }
        Self { v }
    }

    #[inline]
    pub fn at(&self, dx: i32, dy: i32) -> f64 {
        self.v[(dx + 2) as usize][(dy + 2) as usize]
    }

    /// The inner 3×3 patch.
    pub fn inner(&self) -> Stencil3 {
        Stencil3::from_fn(|dx, dy| self.at(dx, dy))
    }

    /// Patch value at (dx, dy) with axes swapped when `axis` is `Y`, so
    /// column-based code can treat either axis as "x".
    #[inline]
    pub fn along(&self, axis: Axis, da: i32, db: i32) -> f64 {
        match axis {
            Axis::X => self.at(da, db),
            Axis::Y => self.at(db, da),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_round_trip() {
        let s = Stencil5::from_fn(|dx, dy| (dx * 10 + dy) as f64);
        assert_eq!(s.at(-2, 2), -18.0);
        assert_eq!(s.at(0, 0), 0.0);
        assert_eq!(s.inner().at(1, -1), 9.0);
    }

    #[test]
    fn axis_swap_transposes() {
        let s = Stencil5::from_fn(|dx, dy| (dx * 10 + dy) as f64);
        assert_eq!(s.along(Axis::X, 2, -1), s.at(2, -1));
        assert_eq!(s.along(Axis::Y, 2, -1), s.at(-1, 2));
    }
}
