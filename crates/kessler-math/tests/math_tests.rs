//! Integration tests for kessler-math.

use glam::DVec3;
use kessler_math::hull::planar_hull;
use kessler_math::interval::{interval_cos, interval_sin};
use kessler_math::VectorInterval;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_interval(rng: &mut StdRng) -> VectorInterval {
    let a = DVec3::new(
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-5.0..5.0),
    );
    let b = DVec3::new(
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-5.0..5.0),
    );
    VectorInterval::new(a, b)
}

/// A sample vector with each component drawn between the interval endpoints.
fn sample(rng: &mut StdRng, iv: &VectorInterval) -> DVec3 {
    let mut v = DVec3::ZERO;
    for axis in 0..3 {
        let lo = iv.lower[axis].min(iv.upper[axis]);
        let hi = iv.lower[axis].max(iv.upper[axis]);
        v[axis] = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
    }
    v
}

// ─── Interval soundness ───────────────────────────────────────

#[test]
fn dot_product_bounds_are_sound() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let ia = random_interval(&mut rng);
        let ib = random_interval(&mut rng);
        let bounds = ia.dot(&ib);
        for _ in 0..50 {
            let a = sample(&mut rng, &ia);
            let b = sample(&mut rng, &ib);
            let d = a.dot(b);
            assert!(
                bounds.contains(d),
                "dot {} outside [{}, {}]",
                d,
                bounds.lower,
                bounds.upper
            );
        }
    }
}

#[test]
fn cross_product_bounds_are_sound() {
    let mut rng = StdRng::seed_from_u64(0xc0ffee);
    for _ in 0..200 {
        let ia = random_interval(&mut rng);
        let ib = random_interval(&mut rng);
        let bounds = ia.cross(&ib);
        for _ in 0..50 {
            let a = sample(&mut rng, &ia);
            let b = sample(&mut rng, &ib);
            let c = a.cross(b);
            for axis in 0..3 {
                assert!(
                    c[axis] >= bounds.lower[axis] - 1e-12 && c[axis] <= bounds.upper[axis] + 1e-12,
                    "cross component {} = {} outside [{}, {}]",
                    axis,
                    c[axis],
                    bounds.lower[axis],
                    bounds.upper[axis]
                );
            }
        }
    }
}

#[test]
fn degenerate_interval_dot_is_exact() {
    let a = DVec3::new(1.0, 2.0, 3.0);
    let b = DVec3::new(-4.0, 0.5, 2.0);
    let bounds = VectorInterval::degenerate(a).dot(&VectorInterval::degenerate(b));
    assert!((bounds.lower - a.dot(b)).abs() < 1e-15);
    assert!((bounds.upper - a.dot(b)).abs() < 1e-15);
}

#[test]
fn straddle_test_requires_magnitude() {
    let iv = VectorInterval::new(DVec3::new(1.0, 0.0, 0.0), DVec3::new(-1.0, 0.0, 0.0));
    let d = iv.dot(&VectorInterval::degenerate(DVec3::X));
    assert!(d.straddles_zero(1e-12));

    // Both endpoints under the threshold: no straddle.
    let tiny = VectorInterval::new(
        DVec3::new(1e-14, 0.0, 0.0),
        DVec3::new(-1e-14, 0.0, 0.0),
    );
    let d = tiny.dot(&VectorInterval::degenerate(DVec3::X));
    assert!(!d.straddles_zero(1e-12));
}

// ─── Interval trig ────────────────────────────────────────────

#[test]
fn sine_covers_extrema() {
    let b = interval_sin(0.0, std::f64::consts::PI);
    assert!((b.upper - 1.0).abs() < 1e-15);

    let b = interval_sin(std::f64::consts::PI, 2.0 * std::f64::consts::PI);
    assert!((b.lower + 1.0).abs() < 1e-15);
}

#[test]
fn sine_sound_on_samples() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let a: f64 = rng.gen_range(0.0..6.0);
        let b: f64 = rng.gen_range(0.0..6.0);
        let bounds = interval_sin(a, b);
        let lo = a.min(b);
        let hi = a.max(b);
        for _ in 0..25 {
            let x = rng.gen_range(lo..=hi.max(lo + 1e-12));
            assert!(bounds.contains(x.sin()));
        }
    }
}

#[test]
fn cosine_full_period_collapses() {
    let b = interval_cos(0.0, 2.0 * std::f64::consts::PI + 0.1);
    assert!((b.lower + 1.0).abs() < 1e-15);
    assert!((b.upper - 1.0).abs() < 1e-15);
}

#[test]
fn cosine_sound_on_samples() {
    let mut rng = StdRng::seed_from_u64(43);
    for _ in 0..200 {
        let a: f64 = rng.gen_range(0.0..6.0);
        let b: f64 = rng.gen_range(a..=6.0);
        let bounds = interval_cos(a, b);
        for _ in 0..25 {
            let x = rng.gen_range(a..=b.max(a + 1e-12));
            assert!(
                bounds.contains(x.cos()),
                "cos({}) = {} outside [{}, {}] for [{}, {}]",
                x,
                x.cos(),
                bounds.lower,
                bounds.upper,
                a,
                b
            );
        }
    }
}

// ─── Convex hull ──────────────────────────────────────────────

#[test]
fn hull_of_square_with_interior_point() {
    let points = vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(1.0, 1.0, 0.0),
        DVec3::new(0.0, 1.0, 0.0),
        DVec3::new(0.5, 0.5, 0.0),
    ];
    let hull = planar_hull(&points);
    assert_eq!(hull.len(), 4);
    assert!(!hull.iter().any(|p| (p.x - 0.5).abs() < 1e-9 && (p.y - 0.5).abs() < 1e-9));
}

#[test]
fn hull_of_collinear_points_is_empty() {
    let points = vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(1.0, 1.0, 0.0),
        DVec3::new(2.0, 2.0, 0.0),
        DVec3::new(3.0, 3.0, 0.0),
    ];
    assert!(planar_hull(&points).is_empty());
}

#[test]
fn hull_of_two_points_is_empty() {
    let points = vec![DVec3::new(0.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0)];
    assert!(planar_hull(&points).is_empty());
}

#[test]
fn hull_contains_all_points() {
    let mut rng = StdRng::seed_from_u64(7);
    let points: Vec<DVec3> = (0..40)
        .map(|_| DVec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0))
        .collect();
    let hull = planar_hull(&points);
    assert!(hull.len() >= 3);
    // Every input point lies inside or on the hull's bounding box.
    let (min_x, max_x) = hull
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
    for p in &points {
        assert!(p.x >= min_x - 1e-12 && p.x <= max_x + 1e-12);
    }
}
