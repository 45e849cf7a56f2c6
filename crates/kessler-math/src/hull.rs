//! 2D convex hull on projected points.
//!
//! The cluster builder sizes each face group's bounding box from the
//! convex hull of its vertices projected onto the first two coordinates.
//! A Graham scan is enough: find the bottom-most/left-most seed, sort by
//! polar angle about it, drop reflex turns.

use glam::DVec3;
use kessler_types::Scalar;

/// Cross product z-component of (b - a) × (c - b); positive for a
/// counter-clockwise turn in the XY plane.
#[inline]
fn turn(a: DVec3, b: DVec3, c: DVec3) -> Scalar {
    (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)
}

fn dist2_xy(a: DVec3, b: DVec3) -> Scalar {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Computes the 2D convex hull of `points`, treating only the first two
/// coordinates. Returns hull vertices in scan order, or an empty vector
/// when fewer than three non-collinear points survive; the caller falls
/// back to the raw point set.
pub fn planar_hull(points: &[DVec3]) -> Vec<DVec3> {
    if points.len() < 3 {
        return Vec::new();
    }

    // Bottom-most, then left-most, seed point.
    let mut seed = 0;
    for (i, p) in points.iter().enumerate().skip(1) {
        let s = points[seed];
        if p.y < s.y || (p.y == s.y && p.x < s.x) {
            seed = i;
        }
    }
    let p0 = points[seed];

    // Sort the remaining points by polar angle about the seed,
    // breaking angle ties by distance.
    let mut rest: Vec<DVec3> = points
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != seed)
        .map(|(_, p)| *p)
        .collect();
    rest.sort_by(|a, b| {
        let t = turn(p0, *a, *b);
        if t.abs() < 1e-12 {
            dist2_xy(p0, *a)
                .partial_cmp(&dist2_xy(p0, *b))
                .unwrap_or(std::cmp::Ordering::Equal)
        } else if t > 0.0 {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Greater
        }
    });

    // Of each run of collinear points keep only the farthest.
    let mut pruned: Vec<DVec3> = Vec::with_capacity(rest.len());
    let mut i = 0;
    while i < rest.len() {
        let mut j = i;
        while j + 1 < rest.len() && turn(p0, rest[j], rest[j + 1]).abs() < 1e-12 {
            j += 1;
        }
        pruned.push(rest[j]);
        i = j + 1;
    }

    if pruned.len() < 2 {
        return Vec::new();
    }

    // Graham scan: pop while the last two stacked points and the
    // incoming point fail to make a left turn.
    let mut stack: Vec<DVec3> = vec![p0, pruned[0]];
    for &p in &pruned[1..] {
        while stack.len() >= 2 && turn(stack[stack.len() - 2], stack[stack.len() - 1], p) <= 1e-12 {
            stack.pop();
        }
        stack.push(p);
    }

    if stack.len() < 3 {
        return Vec::new();
    }
    stack
}
