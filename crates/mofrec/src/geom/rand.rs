//! Random convex cell polygons (jittered circle points + replay tokens).
//!
//! Purpose
//! - Deterministic sampler for small convex polygons (3 to 5 vertices) used
//!   by property tests and benches of the area-matching solver.
//!
//! Model
//! - `n` equally spaced angles on [0, 2π) with bounded angular jitter, all
//!   points on one circle, then an anisotropic scale. Points on a circle are
//!   in convex position and affine maps preserve that, so no hull pass is
//!   needed.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use super::types::{Polygon, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Jittered-circle sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct NgonCfg {
    /// Vertex count, clamped to 3..=5.
    pub vertices: usize,
    /// Angular jitter as a fraction of the base spacing 2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Circumradius before scaling.
    pub radius: f64,
    /// Anisotropic scale applied per axis.
    pub scale: Vec2,
}

impl Default for NgonCfg {
    fn default() -> Self {
        Self {
            vertices: 5,
            angle_jitter_frac: 0.3,
            radius: 0.5,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random convex polygon with `cfg.vertices` vertices.
pub fn draw_ngon(cfg: NgonCfg, tok: ReplayToken) -> Polygon {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertices.clamp(3, 5);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let r = cfg.radius.max(1e-9);
    let delta = 2.0 * std::f64::consts::PI / (n as f64);
    let phase = rng.gen::<f64>() * 2.0 * std::f64::consts::PI;

    let mut poly = Polygon::new();
    for k in 0..n {
        let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
        let a = phase + (k as f64) * delta + jitter;
        poly.push(Vec2::new(
            r * a.cos() * cfg.scale.x,
            r * a.sin() * cfg.scale.y,
        ));
    }
    poly
}

/// Draw a random direction on the unit circle.
pub fn draw_direction(tok: ReplayToken) -> Vec2 {
    let mut rng = tok.to_std_rng();
    let a = rng.gen::<f64>() * std::f64::consts::TAU;
    Vec2::new(a.cos(), a.sin())
}
