//! Broad phase: swept bounding-sphere pair test.
//!
//! Bounds the distance between each body pair over the sub-step with
//! an interval dot product of the swept centre difference; a pair
//! survives when either distance bound dips under the summed bounding
//! radii. Cheap, sound, and the only phase that looks at every pair.

use glam::DVec3;
use kessler_math::VectorInterval;
use kessler_types::Scalar;

/// The swept centre and bounding radius of one body.
#[derive(Debug, Clone, Copy)]
pub struct SphereSweep {
    /// Body position at the start of the step.
    pub r_now: DVec3,
    /// Body position at the end of the step.
    pub r_next: DVec3,
    /// Bounding-sphere radius (m).
    pub radius: Scalar,
}

/// Returns the ordered pairs `(i, j)`, `i < j`, whose bounding spheres
/// may touch during the step. The first index is treated as body A (the
/// active impactor) downstream.
pub fn close_pairs(bodies: &[SphereSweep]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let difference = VectorInterval::new(
                bodies[i].r_now - bodies[j].r_now,
                bodies[i].r_next - bodies[j].r_next,
            );
            let dist2 = difference.dot(&difference);
            let reach = bodies[i].radius + bodies[j].radius;
            if dist2.lower.abs().sqrt() < reach || dist2.upper.abs().sqrt() < reach {
                pairs.push((i, j));
            }
        }
    }
    pairs
}
