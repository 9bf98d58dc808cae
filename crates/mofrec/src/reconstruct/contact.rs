//! Contact-angle normal: rotate the solid normal by the prescribed angle.

use crate::geom::Vec2;

/// Interface normal meeting the solid at contact angle `angle` (radians).
///
/// `ns` is the solid normal, `nf` the current fluid-normal estimate; `nf`
/// only picks the rotation handedness (sign of the 2D cross product ns×nf),
/// the returned direction is a pure rotation of `-ns`. Unit input gives unit
/// output; there is no failure mode.
pub fn normal_contact(ns: Vec2, nf: Vec2, angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    if -ns.x * nf.y + ns.y * nf.x > 0.0 {
        Vec2::new(
            -ns.x * cos + ns.y * sin,
            -ns.x * sin - ns.y * cos,
        )
    } else {
        Vec2::new(
            -ns.x * cos - ns.y * sin,
            ns.x * sin - ns.y * cos,
        )
    }
}
