//! Mid phase: separating-axis test between swept cluster OBBs.
//!
//! Each cluster's bounding box sweeps through the inertial frame as its
//! body translates and rotates over the sub-step. The classic 15-axis
//! OBB SAT (three face axes per box, nine edge cross products) is
//! evaluated with interval arithmetic: an axis separates only when the
//! projected displacement exceeds the summed projected half-extents for
//! *every* pose in the interval, so a rotating box can never be culled
//! by a pose it merely passes through.

use kessler_math::VectorInterval;
use kessler_mesh::FaceCluster;
use kessler_types::{ClusterId, Scalar};

use crate::sweep::SweptPose;

/// A cluster OBB swept over the sub-step.
struct ObbSweep {
    axes: [VectorInterval; 3],
    half: glam::DVec3,
}

impl ObbSweep {
    fn new(cluster: &FaceCluster, pose: &SweptPose, inflation: Scalar) -> Self {
        Self {
            axes: [
                pose.axis_interval(glam::DVec3::X),
                pose.axis_interval(glam::DVec3::Y),
                pose.axis_interval(glam::DVec3::Z),
            ],
            half: cluster.half_extents * inflation,
        }
    }
}

/// True when `candidate` is a separating axis for the two swept boxes:
/// the projected displacement exceeds both boxes' summed projected
/// half-extents, taking the largest absolute endpoint of every interval
/// projection.
fn separating_axis(
    displacement: &VectorInterval,
    candidate: &VectorInterval,
    box1: &ObbSweep,
    box2: &ObbSweep,
) -> bool {
    let lhs = candidate.dot(displacement).max_abs();

    let mut rhs = 0.0;
    for axis in 0..3 {
        rhs += box1.half[axis] * candidate.dot(&box1.axes[axis]).max_abs();
    }
    for axis in 0..3 {
        rhs += box2.half[axis] * candidate.dot(&box2.axes[axis]).max_abs();
    }

    lhs > rhs
}

/// Runs the 15-axis swept SAT over every cluster pair of a close body
/// pair, returning the indices `(cluster_of_a, cluster_of_b)` that
/// cannot be proven separated.
pub fn cull_cluster_pairs(
    clusters_a: &[FaceCluster],
    clusters_b: &[FaceCluster],
    pose_a: &SweptPose,
    pose_b: &SweptPose,
    inflation: Scalar,
) -> Vec<(ClusterId, ClusterId)> {
    let mut overlaps = Vec::new();

    for (ia, ca) in clusters_a.iter().enumerate() {
        let box1 = ObbSweep::new(ca, pose_a, inflation);
        for (ib, cb) in clusters_b.iter().enumerate() {
            let box2 = ObbSweep::new(cb, pose_b, inflation);

            let displacement = pose_a
                .world_interval(ca.centroid)
                .sub(&pose_b.world_interval(cb.centroid));

            let mut separated = false;
            for axis in &box1.axes {
                if separating_axis(&displacement, axis, &box1, &box2) {
                    separated = true;
                    break;
                }
            }
            if !separated {
                for axis in &box2.axes {
                    if separating_axis(&displacement, axis, &box1, &box2) {
                        separated = true;
                        break;
                    }
                }
            }
            if !separated {
                'cross: for a1 in &box1.axes {
                    for a2 in &box2.axes {
                        let candidate = a1.cross(a2);
                        if separating_axis(&displacement, &candidate, &box1, &box2) {
                            separated = true;
                            break 'cross;
                        }
                    }
                }
            }

            if !separated {
                overlaps.push((ClusterId(ia as u32), ClusterId(ib as u32)));
            }
        }
    }

    overlaps
}
