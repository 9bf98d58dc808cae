use super::*;
use crate::geom::rand::{draw_ngon, NgonCfg, ReplayToken};
use crate::geom::{polygon_area, GeomCfg, Line, Polygon, Vec2};
use proptest::prelude::*;

/// Exact area of `poly` clipped to the half-plane `nc·x <= alpha`
/// (Sutherland-Hodgman on the convex ring).
fn exact_clip_area(poly: &Polygon, nc: Vec2, alpha: f64) -> f64 {
    let n = poly.len();
    let mut out: Vec<Vec2> = Vec::with_capacity(n + 2);
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let da = nc.dot(&a) - alpha;
        let db = nc.dot(&b) - alpha;
        if da <= 0.0 {
            out.push(a);
        }
        if (da < 0.0) != (db < 0.0) && (da - db).abs() > 0.0 {
            out.push(a + (b - a) * (da / (da - db)));
        }
    }
    if out.len() < 3 {
        return 0.0;
    }
    // Shoelace on the already-ordered ring.
    let m = out.len();
    let mut area = 0.0;
    for i in 0..m {
        let j = (i + 1) % m;
        area += out[i].x * out[j].y - out[j].x * out[i].y;
    }
    (area / 2.0).abs()
}

fn sample_normal(idx: u64) -> Vec2 {
    crate::geom::rand::draw_direction(ReplayToken { seed: 99, index: idx })
}

#[test]
fn area_match_inverts_exactly_across_random_regions() {
    let cfg = GeomCfg::default();
    for idx in 0..300u64 {
        let poly = draw_ngon(
            NgonCfg {
                vertices: 3 + (idx % 3) as usize,
                scale: Vec2::new(1.0, 0.7),
                ..NgonCfg::default()
            },
            ReplayToken { seed: 5, index: idx },
        );
        let total = polygon_area(poly.as_slice()).unwrap();
        let nc = sample_normal(idx);
        for frac in [0.05, 0.25, 0.5, 0.75, 0.95] {
            let target = frac * total;
            let cut = area_match(target, &poly, nc, &cfg);
            let got = exact_clip_area(&poly, nc, cut.alpha);
            assert!(
                (got - target).abs() < 1e-9 * total.max(1.0),
                "idx={idx} frac={frac}: got {got}, want {target}"
            );
        }
    }
}

#[test]
fn area_match_offset_is_monotone_in_target() {
    let cfg = GeomCfg::default();
    for idx in 0..100u64 {
        let poly = draw_ngon(
            NgonCfg {
                vertices: 3 + (idx % 3) as usize,
                ..NgonCfg::default()
            },
            ReplayToken { seed: 17, index: idx },
        );
        let total = polygon_area(poly.as_slice()).unwrap();
        let nc = sample_normal(idx + 1000);
        let mut prev = f64::NEG_INFINITY;
        for k in 1..20 {
            let cut = area_match(total * k as f64 / 20.0, &poly, nc, &cfg);
            assert!(
                cut.alpha >= prev - 1e-12,
                "idx={idx} k={k}: alpha went backward"
            );
            prev = cut.alpha;
        }
    }
}

#[test]
fn area_match_is_bitwise_deterministic() {
    let cfg = GeomCfg::default();
    let poly = draw_ngon(NgonCfg::default(), ReplayToken { seed: 3, index: 8 });
    let nc = Vec2::new(0.31, -0.87);
    let a = area_match(0.2, &poly, nc, &cfg);
    let b = area_match(0.2, &poly, nc, &cfg);
    assert_eq!(a.alpha.to_bits(), b.alpha.to_bits());
    assert_eq!(a.facet.a, b.facet.a);
    assert_eq!(a.facet.b, b.facet.b);
}

#[test]
fn reconstruction_pipeline_round_trips_a_wetted_floor() {
    let cfg = GeomCfg::default();
    // Cut cell: solid floor below y = -0.2, fluid wetting the left part.
    let solid = Line::new(Vec2::new(0.0, -1.0), 0.2);
    let nc = normal_contact(
        Vec2::new(0.0, -1.0),
        Vec2::new(1.0, 0.0),
        std::f64::consts::FRAC_PI_2,
    );
    // 90° on a floor with fluid to the left: vertical interface.
    assert!(nc.y.abs() < 1e-12);
    let rec = polygon_alpha(0.3, nc, solid, &cfg).unwrap();
    let got = exact_clip_area(&rec.region, nc, rec.alpha);
    assert!((got - 0.3).abs() < 1e-9, "got {got}");
}

#[test]
fn flux_never_exceeds_the_swept_slab() {
    let cfg = GeomCfg::default();
    for idx in 0..100u64 {
        let solid = Line::new(sample_normal(idx + 2000), 0.1);
        let nc = sample_normal(idx + 3000);
        let Some(rec) = polygon_alpha(0.2, nc, solid, &cfg) else {
            continue;
        };
        let un = -0.25;
        let got = polygon_fraction(
            &rec.region,
            un,
            -1.0,
            rec.facet.as_ref(),
            nc,
            rec.alpha,
            &cfg,
        );
        if let Ok(a) = got {
            assert!(a >= -1e-12 && a <= un.abs() + 1e-12, "idx={idx} a={a}");
        }
    }
}

proptest! {
    #[test]
    fn contact_normal_is_unit_and_recovers_the_angle(
        phi in 0.0..std::f64::consts::TAU,
        psi in 0.0..std::f64::consts::TAU,
        theta in 1e-3..(std::f64::consts::PI - 1e-3),
    ) {
        let ns = Vec2::new(phi.cos(), phi.sin());
        let nf = Vec2::new(psi.cos(), psi.sin());
        let nc = normal_contact(ns, nf, theta);
        prop_assert!((nc.norm() - 1.0).abs() < 1e-12);
        // nc is -ns rotated by ±theta.
        let cos = nc.dot(&-ns).clamp(-1.0, 1.0);
        prop_assert!((cos.acos() - theta).abs() < 1e-9);
    }

    #[test]
    fn classifier_is_total(
        cs_seed in proptest::array::uniform9(0.0f64..1.2),
        c_seed in proptest::array::uniform9(0.0f64..1.2),
        angle in 0.1f64..3.0,
    ) {
        let cfg = GeomCfg::default();
        let cs = Stencil3::from_fn(|dx, dy| cs_seed[(3 * (dx + 1) + dy + 1) as usize].min(1.0));
        let c = Stencil3::from_fn(|dx, dy| {
            let i = (3 * (dx + 1) + dy + 1) as usize;
            c_seed[i].min(cs_seed[i].min(1.0))
        });
        let faces = CellFaces { xm: 0.4, xp: 0.6, ym: 0.3, yp: 0.9 };
        let class = classify(&cs, &c, &faces, angle, &cfg);
        // Consistency with the coarse invariants.
        if cs.center() <= 0.0 {
            prop_assert_eq!(class, CellClass::Exterior);
        } else if cs.center() >= 1.0 && !interfacial_wide(&cs) {
            prop_assert!(matches!(
                class,
                CellClass::Interface | CellClass::Empty | CellClass::Full
            ));
        } else {
            prop_assert!(matches!(
                class,
                CellClass::CutEmpty
                    | CellClass::CutFull
                    | CellClass::ContactLine
                    | CellClass::NearContact
            ));
        }
    }
}
